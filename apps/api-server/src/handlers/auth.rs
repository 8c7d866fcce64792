//! Authentication handlers.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use gatekeep_core::domain::NewUser;
use gatekeep_shared::dto::{
    AuthResponse, CreatedResponse, LoginRequest, ResultResponse, SignupRequest,
};

use super::validation::{
    EMAIL_VALIDATION_ERROR, NAME_VALIDATION_ERROR, PASSWORD_VALIDATION_ERROR, is_email_valid,
    is_name_valid, is_password_valid,
};
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /gicicm/auth/signup
pub async fn signup(
    state: web::Data<AppState>,
    body: web::Json<SignupRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if !is_email_valid(&req.email) {
        return Err(AppError::BadRequest(EMAIL_VALIDATION_ERROR.to_string()));
    }
    if !is_password_valid(&req.password) {
        return Err(AppError::BadRequest(PASSWORD_VALIDATION_ERROR.to_string()));
    }
    if !is_name_valid(&req.name) {
        return Err(AppError::BadRequest(NAME_VALIDATION_ERROR.to_string()));
    }

    state
        .users
        .create(NewUser::new(req.email, req.name.trim()), &req.password)
        .await?;

    Ok(HttpResponse::Created().json(CreatedResponse::default()))
}

/// POST /gicicm/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let token = state.auth.login(&req.email, &req.password).await?;
    let expires_in = token.claims.remaining(Utc::now()).num_seconds().max(0) as u64;

    Ok(HttpResponse::Ok().json(AuthResponse::bearer(token.as_str(), expires_in)))
}

/// POST /gicicm/auth/logout - Protected route
pub async fn logout(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    state.auth.logout(&identity.token, identity.email()).await?;

    Ok(HttpResponse::Ok().json(ResultResponse::new("Successfully Logged Out")))
}
