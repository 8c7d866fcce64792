//! HTTP handlers and route configuration.

mod auth;
mod health;
mod users;
mod validation;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/gicicm")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/auth")
                    .route("/signup", web::post().to(auth::signup))
                    .route("/login", web::post().to(auth::login))
                    .route("/logout", web::post().to(auth::logout)),
            )
            // Protected routes
            .service(
                web::scope("/users")
                    .route("", web::get().to(users::list_users))
                    .route("/{email}", web::delete().to(users::delete_user)),
            ),
    );
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test, web};
    use serde_json::{Value, json};

    use gatekeep_core::EmailSuffixPolicy;
    use gatekeep_infra::{
        Argon2PasswordService, InMemoryCache, InMemoryUserStore, JwtConfig, JwtTokenCodec,
    };

    use super::configure_routes;
    use crate::state::{AppState, Ports};

    const PASSWORD: &str = "P@ssw0rd123";

    fn test_state() -> AppState {
        let passwords = Argon2PasswordService::with_params(1024, 1, 1)
            .expect("argon2 params should be valid");
        let codec = JwtTokenCodec::new(JwtConfig {
            secret: "handler-test-secret".to_string(),
            ..JwtConfig::default()
        });

        AppState::from_ports(
            Ports {
                cache: Arc::new(InMemoryCache::new()),
                store: Arc::new(InMemoryUserStore::new()),
                passwords: Arc::new(passwords),
                codec: Arc::new(codec),
                admin_policy: Arc::new(EmailSuffixPolicy::new("@test.com")),
            },
            None,
        )
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state.clone()))
                    .configure(configure_routes),
            )
            .await
        };
    }

    macro_rules! signup_and_login {
        ($app:expr, $email:expr) => {{
            let req = test::TestRequest::post()
                .uri("/gicicm/auth/signup")
                .set_json(json!({ "name": "Clayton", "email": $email, "password": PASSWORD }))
                .to_request();
            let resp = test::call_service(&$app, req).await;
            assert_eq!(resp.status(), StatusCode::CREATED);

            let req = test::TestRequest::post()
                .uri("/gicicm/auth/login")
                .set_json(json!({ "email": $email, "password": PASSWORD }))
                .to_request();
            let body: Value = test::call_and_read_body_json(&$app, req).await;
            body["access_token"]
                .as_str()
                .expect("login should return a token")
                .to_string()
        }};
    }

    #[actix_web::test]
    async fn test_health() {
        let state = test_state();
        let app = app!(state);

        let req = test::TestRequest::get().uri("/gicicm/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "ok");
    }

    #[actix_web::test]
    async fn test_signup_rejects_weak_password() {
        let state = test_state();
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/gicicm/auth/signup")
            .set_json(json!({ "name": "Clayton", "email": "c@mail.com", "password": "short" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_signup_twice_conflicts() {
        let state = test_state();
        let app = app!(state);
        signup_and_login!(app, "c@mail.com");

        let req = test::TestRequest::post()
            .uri("/gicicm/auth/signup")
            .set_json(json!({ "name": "Again", "email": "c@mail.com", "password": PASSWORD }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn test_login_wrong_password() {
        let state = test_state();
        let app = app!(state);
        signup_and_login!(app, "c@mail.com");

        let req = test::TestRequest::post()
            .uri("/gicicm/auth/login")
            .set_json(json!({ "email": "c@mail.com", "password": "Wr0ng!pass" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_list_users_requires_token() {
        let state = test_state();
        let app = app!(state);

        let req = test::TestRequest::get().uri("/gicicm/users").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_list_users_hides_passwords() {
        let state = test_state();
        let app = app!(state);
        let token = signup_and_login!(app, "c@mail.com");

        let req = test::TestRequest::get()
            .uri("/gicicm/users")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        let users = body.as_array().expect("list should be an array");
        assert_eq!(users.len(), 1);
        assert_eq!(users[0]["email"], "c@mail.com");
        assert!(users[0].get("password").is_none());
    }

    #[actix_web::test]
    async fn test_logout_revokes_token() {
        let state = test_state();
        let app = app!(state);
        let token = signup_and_login!(app, "c@mail.com");

        let req = test::TestRequest::post()
            .uri("/gicicm/auth/logout")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/gicicm/users")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_delete_requires_admin() {
        let state = test_state();
        let app = app!(state);
        let token = signup_and_login!(app, "c@mail.com");

        let req = test::TestRequest::delete()
            .uri("/gicicm/users/c@mail.com")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_admin_deletes_user() {
        let state = test_state();
        let app = app!(state);
        signup_and_login!(app, "c@mail.com");
        let admin = signup_and_login!(app, "root@test.com");

        let req = test::TestRequest::delete()
            .uri("/gicicm/users/c@mail.com")
            .insert_header(("Authorization", format!("Bearer {admin}")))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["result"], "Successfully Deleted");

        let req = test::TestRequest::delete()
            .uri("/gicicm/users/c@mail.com")
            .insert_header(("Authorization", format!("Bearer {admin}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
