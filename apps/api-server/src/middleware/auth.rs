//! Authentication extractor.

use std::future::Future;
use std::pin::Pin;

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};

use gatekeep_core::domain::TokenClaims;

use crate::middleware::error::AppError;
use crate::state::AppState;

/// Authenticated caller, resolved from the `Authorization: Bearer` header.
///
/// Use this in handlers to require authentication:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.email())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub token: String,
    pub claims: TokenClaims,
}

impl Identity {
    pub fn email(&self) -> &str {
        &self.claims.email
    }
}

fn bearer_token(req: &HttpRequest) -> Result<String, AppError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(AppError::invalid_token)?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AppError::invalid_token())?;

    auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .ok_or_else(AppError::invalid_token)
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let token = bearer_token(req);

        Box::pin(async move {
            let state = state.ok_or_else(|| {
                tracing::error!("AppState not found in app data");
                AppError::Internal("Server configuration error".to_string())
            })?;
            let token = token?;

            let claims = state.auth.verify(&token).await?;
            Ok(Identity { token, claims })
        })
    }
}
