//! # AppError
//!
//! Centralized error handling for the Rusty-Forum core.
//! Every failure a use case can produce is one of the variants below; the
//! web layer decides how each one is rendered.

use std::fmt;

use thiserror::Error;

/// The addressable resources guarded by existence and ownership checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Thread,
    Comment,
    Reply,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Resource::Thread => "thread",
            Resource::Comment => "comment",
            Resource::Reply => "reply",
        })
    }
}

/// Why a creation payload was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationReason {
    /// A required key is absent, null, or an empty string.
    MissingRequiredField,
    /// A present field is not text.
    WrongDataType,
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValidationReason::MissingRequiredField => "MISSING_REQUIRED_FIELD",
            ValidationReason::WrongDataType => "WRONG_DATA_TYPE",
        })
    }
}

/// Rejection of a malformed value object, raised at construction time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{entity}.{reason}")]
pub struct ValidationError {
    /// Entity code, e.g. `NEW_COMMENT`.
    pub entity: &'static str,
    pub reason: ValidationReason,
}

impl ValidationError {
    pub fn missing(entity: &'static str) -> Self {
        Self { entity, reason: ValidationReason::MissingRequiredField }
    }

    pub fn wrong_type(entity: &'static str) -> Self {
        Self { entity, reason: ValidationReason::WrongDataType }
    }
}

/// The primary error type for all rf-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed creation payload (missing field or wrong type)
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Referenced thread, comment or reply does not exist
    #[error("{0} not found")]
    NotFound(Resource),

    /// Caller is not the owner of the resource
    #[error("{0}.NOT_OWNER")]
    Authorization(Resource),

    /// Infrastructure failure (e.g., DB down, constraint violation)
    #[error("internal service error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        // keep the full context chain for the boundary log line
        AppError::Internal(format!("{err:#}"))
    }
}

/// A specialized Result type for Rusty-Forum logic.
pub type Result<T> = std::result::Result<T, AppError>;
