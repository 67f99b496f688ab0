//! rusty-forum/crates/rf-api/src/middleware.rs Middleware
//!
//! Request logging, CORS, and caller identity.

use actix_cors::Cors;
use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::middleware::Logger;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use rf_core::error::AppError;

use crate::error::ApiError;
use crate::handlers::AppState;

/// Returns a standard access logger for the Rusty-Forum API.
pub fn standard_middleware() -> Logger {
    // remote-ip "request-line" status-code response-size "referrer" "user-agent"
    Logger::default()
}

/// Configures CORS for a UI served from another origin.
pub fn cors_policy() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(3600)
}

/// The caller's user id, as vouched for by the configured `AuthProvider`.
///
/// Handlers that take this extractor reject anonymous requests with 401
/// before any use case runs.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub String);

fn bearer_token(req: &HttpRequest) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

async fn resolve_user(
    state: Option<web::Data<AppState>>,
    token: Option<String>,
) -> Result<AuthenticatedUser, ApiError> {
    let state =
        state.ok_or_else(|| AppError::Internal("application state is not registered".into()))?;
    let token = token.ok_or(ApiError::Unauthenticated)?;

    match state.auth.authenticate(&token).await {
        Ok(Some(user_id)) => Ok(AuthenticatedUser(user_id)),
        Ok(None) => Err(ApiError::Unauthenticated),
        Err(err) => Err(AppError::from(err).into()),
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        Box::pin(resolve_user(state, bearer_token(req)))
    }
}
