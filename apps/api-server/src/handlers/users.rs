//! User administration handlers.

use actix_web::{HttpResponse, web};

use gatekeep_shared::dto::{ResultResponse, UserResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /gicicm/users
pub async fn list_users(
    state: web::Data<AppState>,
    _identity: Identity,
) -> AppResult<HttpResponse> {
    let users: Vec<UserResponse> = state
        .users
        .list()
        .await?
        .into_iter()
        .map(|u| UserResponse {
            id: u.id.to_string(),
            email: u.email,
            name: u.name,
        })
        .collect();

    Ok(HttpResponse::Ok().json(users))
}

/// DELETE /gicicm/users/{email} - admins only
pub async fn delete_user(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    identity.claims.ensure_admin()?;

    let email = path.into_inner();
    state.users.delete(&email).await?;

    Ok(HttpResponse::Ok().json(ResultResponse::new("Successfully Deleted")))
}
