//! Boundary and configuration error model.
//! Queries never return these: the resolver answers fail-closed instead. Errors only
//! surface where untrusted input (session payloads, config files) is normalized.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthzError {
    #[error("unknown role '{0}'")]
    UnknownRole(String),
    #[error("unknown permission '{0}'")]
    UnknownPermission(String),
    #[error("invalid user payload: {0}")]
    InvalidPayload(String),
    #[error("config error in {path}: {message}")]
    Config { path: String, message: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl AuthzError {
    pub fn config<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        AuthzError::Config { path: path.into(), message: message.into() }
    }

    /// Stable snake_case code, suitable for API error bodies and log fields.
    pub fn code_str(&self) -> &'static str {
        match self {
            AuthzError::UnknownRole(_) => "unknown_role",
            AuthzError::UnknownPermission(_) => "unknown_permission",
            AuthzError::InvalidPayload(_) => "invalid_payload",
            AuthzError::Config { .. } => "config_error",
            AuthzError::Io(_) => "io_error",
            AuthzError::Json(_) => "json_error",
        }
    }

    /// True for errors caused by caller-supplied data rather than the environment.
    pub fn is_user_input(&self) -> bool {
        matches!(
            self,
            AuthzError::UnknownRole(_) | AuthzError::UnknownPermission(_) | AuthzError::InvalidPayload(_) | AuthzError::Json(_)
        )
    }
}

pub type AuthzResult<T> = Result<T, AuthzError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
