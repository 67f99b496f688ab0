//! Mapping from core failures to HTTP responses.
//!
//! rf-core never phrases a user-facing message; this is the only place that
//! does.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use rf_core::error::{AppError, ValidationReason};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// No bearer token, or one the auth provider refused.
    #[error("missing authentication")]
    Unauthenticated,

    /// Body is not JSON, or was sent without a JSON content type.
    #[error("unreadable request body")]
    MalformedBody,

    #[error(transparent)]
    App(#[from] AppError),
}

fn entity_noun(entity: &str) -> &'static str {
    match entity {
        "NEW_THREAD" | "ADDED_THREAD" => "thread",
        "NEW_COMMENT" | "ADDED_COMMENT" => "comment",
        "NEW_REPLY" | "ADDED_REPLY" => "reply",
        _ => "resource",
    }
}

impl ApiError {
    fn message(&self) -> String {
        match self {
            ApiError::Unauthenticated => "Missing authentication".to_string(),
            ApiError::MalformedBody => "request body must be a JSON object".to_string(),
            ApiError::App(AppError::Validation(err)) => {
                let noun = entity_noun(err.entity);
                match err.reason {
                    ValidationReason::MissingRequiredField => {
                        format!("cannot create a new {noun} because a required property is missing")
                    }
                    ValidationReason::WrongDataType => {
                        format!("cannot create a new {noun} because a property has the wrong data type")
                    }
                }
            }
            ApiError::App(AppError::NotFound(resource)) => format!("{resource} not found"),
            ApiError::App(AppError::Authorization(resource)) => {
                format!("you are not allowed to modify this {resource}")
            }
            ApiError::App(AppError::Internal(_)) => "an internal server error occurred".to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::MalformedBody => StatusCode::BAD_REQUEST,
            ApiError::App(AppError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::App(AppError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::App(AppError::Authorization(_)) => StatusCode::FORBIDDEN,
            ApiError::App(AppError::Internal(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = if status.is_server_error() {
            // cause goes to the log, never to the client
            error!(error = %self, "request failed");
            json!({ "status": "error", "message": self.message() })
        } else {
            json!({ "status": "fail", "message": self.message() })
        };
        HttpResponse::build(status).json(body)
    }
}
