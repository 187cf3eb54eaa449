//! # Ladle Error Infrastructure
//!
//! Error types and API response handling shared by every crate in the
//! workspace. Handlers return `Result<T>` and rely on the `IntoResponse`
//! impl to produce the right status code and JSON envelope.

pub mod response;
pub mod traits;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub use response::{ApiResponse, PaginationMeta};
pub use traits::ResultExt;

/// Convenience type alias for Result with AppError.
pub type Result<T, E = AppError> = std::result::Result<T, E>;

/// Main application error type.
///
/// Every variant maps to exactly one HTTP status. Policy failures are
/// terminal for the request that raised them, never for the process.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("NotFound: {message}")]
    NotFound {
        message: String,
    },

    #[error("BadRequest: {message}")]
    BadRequest {
        message: String,
    },

    #[error("Unauthorized: {message}")]
    Unauthorized {
        message: String,
    },

    #[error("Forbidden: {message}")]
    Forbidden {
        message: String,
    },

    #[error("Conflict: {message}")]
    Conflict {
        message: String,
    },

    /// The resource existed but is past its lifetime (expired codes).
    #[error("Gone: {message}")]
    Gone {
        message: String,
    },

    /// The account is already in the verified terminal state.
    #[error("AlreadyVerified: {message}")]
    AlreadyVerified {
        message: String,
    },

    /// Issuance throttled; `seconds_left` is how long the caller must wait.
    #[error("RateLimited: retry in {seconds_left}s")]
    RateLimited {
        seconds_left: i64,
    },

    #[error("Validation: {message}")]
    Validation {
        message: String,
    },

    #[error("Internal: {message}")]
    Internal {
        message: String,
    },

    #[error("Database: {message}")]
    Database {
        message: String,
    },

    #[error("Cache: {message}")]
    Cache {
        message: String,
    },

    #[error("IO: {message}")]
    Io {
        message: String,
    },

    #[error("Config: {message}")]
    Config {
        message: String,
    },
}

impl AppError {
    /// Creates a not found error.
    #[inline]
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self { Self::NotFound { message: message.into() } }

    /// Creates a bad request error.
    #[inline]
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self { Self::BadRequest { message: message.into() } }

    /// Creates an unauthorized error.
    #[inline]
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self { Self::Unauthorized { message: message.into() } }

    /// Creates a forbidden error.
    #[inline]
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self { Self::Forbidden { message: message.into() } }

    /// Creates a conflict error.
    #[inline]
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self { Self::Conflict { message: message.into() } }

    /// Creates a gone error.
    #[inline]
    #[must_use]
    pub fn gone(message: impl Into<String>) -> Self { Self::Gone { message: message.into() } }

    /// Creates an already-verified error.
    #[inline]
    #[must_use]
    pub fn already_verified(message: impl Into<String>) -> Self {
        Self::AlreadyVerified { message: message.into() }
    }

    /// Creates a rate limited error.
    #[inline]
    #[must_use]
    pub fn rate_limited(seconds_left: i64) -> Self { Self::RateLimited { seconds_left } }

    /// Creates a validation error.
    #[inline]
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self { Self::Validation { message: message.into() } }

    /// Creates an internal error.
    #[inline]
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self { Self::Internal { message: message.into() } }

    /// Creates a configuration error.
    #[inline]
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self { Self::Config { message: message.into() } }

    /// The HTTP status this error maps to.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::BadRequest { .. } | Self::AlreadyVerified { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Gone { .. } => StatusCode::GONE,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal { .. } | Self::Database { .. } | Self::Cache { .. } | Self::Io { .. } |
            Self::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// A stable machine-readable code for API consumers.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::BadRequest { .. } => "BAD_REQUEST",
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::Forbidden { .. } => "FORBIDDEN",
            Self::Conflict { .. } => "CONFLICT",
            Self::Gone { .. } => "GONE",
            Self::AlreadyVerified { .. } => "ALREADY_VERIFIED",
            Self::RateLimited { .. } => "RATE_LIMITED",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Internal { .. } => "INTERNAL_ERROR",
            Self::Database { .. } => "DATABASE_ERROR",
            Self::Cache { .. } => "CACHE_ERROR",
            Self::Io { .. } => "IO_ERROR",
            Self::Config { .. } => "CONFIG_ERROR",
        }
    }

    /// The human-readable message, without the variant prefix.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::NotFound { message } |
            Self::BadRequest { message } |
            Self::Unauthorized { message } |
            Self::Forbidden { message } |
            Self::Conflict { message } |
            Self::Gone { message } |
            Self::AlreadyVerified { message } |
            Self::Validation { message } |
            Self::Internal { message } |
            Self::Database { message } |
            Self::Cache { message } |
            Self::Io { message } |
            Self::Config { message } => message.clone(),
            Self::RateLimited { seconds_left } => {
                format!("Too many requests; retry in {seconds_left} seconds")
            },
        }
    }

    /// Prefixes the message with additional context.
    #[must_use]
    pub fn context<C: ToString>(self, context: C) -> Self {
        let ctx = context.to_string();
        let wrap = |message: String| format!("{ctx}: {message}");
        match self {
            Self::NotFound { message } => Self::NotFound { message: wrap(message) },
            Self::BadRequest { message } => Self::BadRequest { message: wrap(message) },
            Self::Unauthorized { message } => Self::Unauthorized { message: wrap(message) },
            Self::Forbidden { message } => Self::Forbidden { message: wrap(message) },
            Self::Conflict { message } => Self::Conflict { message: wrap(message) },
            Self::Gone { message } => Self::Gone { message: wrap(message) },
            Self::AlreadyVerified { message } => Self::AlreadyVerified { message: wrap(message) },
            Self::Validation { message } => Self::Validation { message: wrap(message) },
            Self::Internal { message } => Self::Internal { message: wrap(message) },
            Self::Database { message } => Self::Database { message: wrap(message) },
            Self::Cache { message } => Self::Cache { message: wrap(message) },
            Self::Io { message } => Self::Io { message: wrap(message) },
            Self::Config { message } => Self::Config { message: wrap(message) },
            Self::RateLimited { seconds_left } => Self::RateLimited { seconds_left },
        }
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err {
            sea_orm::DbErr::RecordNotFound(message) => Self::NotFound { message },
            other => Self::Database {
                message: other.to_string(),
            },
        }
    }
}

impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        Self::Cache {
            message: err.to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let messages = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map_or_else(|| e.code.to_string(), |m| m.to_string())
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{field}: {messages}")
            })
            .collect();
        fields.sort();
        Self::Validation {
            message: fields.join("; "),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal {
            message: format!("serialization error: {err}"),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal {
            message: err.to_string(),
        }
    }
}

impl From<String> for AppError {
    fn from(message: String) -> Self { Self::Internal { message } }
}

impl From<&str> for AppError {
    fn from(message: &str) -> Self {
        Self::Internal {
            message: message.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(code = self.code(), error = %self, "request failed");
        }

        let mut body = json!({
            "status": "error",
            "code": self.code(),
            "message": self.message(),
        });
        if let Self::RateLimited { seconds_left } = &self {
            body["seconds_left"] = json!(seconds_left);
        }

        let mut response = (status, Json(body)).into_response();
        if let Self::RateLimited { seconds_left } = self {
            if let Ok(value) = HeaderValue::from_str(&seconds_left.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::already_verified("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::rate_limited(42).status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(AppError::gone("x").status(), StatusCode::GONE);
        assert_eq!(AppError::validation("x").status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(AppError::internal("x").status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_context_prefixes_message() {
        let err = AppError::not_found("user").context("redeeming code");
        assert_eq!(format!("{err}"), "NotFound: redeeming code: user");
    }

    #[test]
    fn test_rate_limited_keeps_seconds() {
        let err = AppError::rate_limited(17).context("ignored");
        match err {
            AppError::RateLimited { seconds_left } => assert_eq!(seconds_left, 17),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_db_err_record_not_found_maps_to_404() {
        let err: AppError = sea_orm::DbErr::RecordNotFound("user".to_string()).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_message_strips_variant_prefix() {
        assert_eq!(AppError::gone("code expired").message(), "code expired");
    }
}
