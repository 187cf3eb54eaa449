//! # Error Traits
//!
//! Extension methods for converting and annotating errors.

use crate::{AppError, Result};

/// Extension methods for Result types.
pub trait ResultExt<T> {
    /// Converts the error into an [`AppError`] with an added context prefix.
    fn with_context<C: ToString>(self, context: C) -> Result<T>;

    /// Converts the error into an [`AppError`], logging it at error level.
    fn log_error(self) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<AppError>,
{
    fn with_context<C: ToString>(self, context: C) -> Result<T> {
        self.map_err(|e| {
            let err: AppError = e.into();
            err.context(context)
        })
    }

    fn log_error(self) -> Result<T> {
        self.map_err(|e| {
            let err: AppError = e.into();
            tracing::error!(error = %err, "Error occurred");
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_context() {
        let result: Result<i32> = Err(AppError::not_found("user"));
        let result = result.with_context("loading profile");

        assert_eq!(
            format!("{}", result.unwrap_err()),
            "NotFound: loading profile: user"
        );
    }

    #[test]
    fn test_log_error_passes_through() {
        let result: Result<i32> = Err(AppError::not_found("user"));
        assert!(result.log_error().is_err());

        let result: Result<i32> = Ok(42);
        assert_eq!(result.log_error().unwrap(), 42);
    }
}
