//! # Error Crate Tests
//!
//! Tests for error types, the response envelope, and conversions.

mod error_response_tests {
    use error::AppError;

    #[test]
    fn test_error_creation() {
        let error = AppError::not_found("User not found");
        assert!(matches!(error, AppError::NotFound { .. }));
    }

    #[test]
    fn test_error_message() {
        let error = AppError::bad_request("Invalid input");
        let msg = format!("{}", error);
        assert_eq!(msg, "BadRequest: Invalid input");
    }

    #[test]
    fn test_validation_errors_flatten_to_field_messages() {
        use validator::Validate;

        #[derive(Validate)]
        struct Probe {
            #[validate(length(min = 4, message = "too short"))]
            username: String,
        }

        let probe = Probe {
            username: "ab".to_string(),
        };
        let err: AppError = probe.validate().unwrap_err().into();
        assert!(matches!(err, AppError::Validation { .. }));
        assert!(err.message().contains("username"));
        assert!(err.message().contains("too short"));
    }
}

mod error_status_mapping_tests {
    use axum::http::StatusCode;
    use error::AppError;

    #[test]
    fn test_every_variant_has_a_status() {
        let cases = vec![
            (AppError::not_found("x"), StatusCode::NOT_FOUND),
            (AppError::bad_request("x"), StatusCode::BAD_REQUEST),
            (AppError::unauthorized("x"), StatusCode::UNAUTHORIZED),
            (AppError::forbidden("x"), StatusCode::FORBIDDEN),
            (AppError::conflict("x"), StatusCode::CONFLICT),
            (AppError::gone("x"), StatusCode::GONE),
            (AppError::already_verified("x"), StatusCode::BAD_REQUEST),
            (AppError::rate_limited(30), StatusCode::TOO_MANY_REQUESTS),
            (AppError::validation("x"), StatusCode::UNPROCESSABLE_ENTITY),
            (AppError::internal("x"), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::config("x"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(error.status(), expected, "variant: {error:?}");
        }
    }

    #[test]
    fn test_error_codes_are_unique() {
        let codes = vec![
            AppError::not_found("x").code(),
            AppError::bad_request("x").code(),
            AppError::unauthorized("x").code(),
            AppError::forbidden("x").code(),
            AppError::conflict("x").code(),
            AppError::gone("x").code(),
            AppError::already_verified("x").code(),
            AppError::rate_limited(1).code(),
            AppError::validation("x").code(),
            AppError::internal("x").code(),
        ];
        let unique: std::collections::HashSet<_> = codes.iter().collect();
        assert_eq!(unique.len(), codes.len(), "All codes should be unique");
    }
}

mod into_response_tests {
    use axum::{http::header, response::IntoResponse};
    use error::AppError;

    #[test]
    fn test_app_error_into_response() {
        let response = AppError::not_found("Test not found").into_response();
        assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);

        let response = AppError::already_verified("already done").into_response();
        assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);

        let response = AppError::gone("expired").into_response();
        assert_eq!(response.status(), axum::http::StatusCode::GONE);
    }

    #[test]
    fn test_rate_limited_sets_retry_after() {
        let response = AppError::rate_limited(42).into_response();
        assert_eq!(response.status(), axum::http::StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response.headers().get(header::RETRY_AFTER).unwrap(),
            "42"
        );
    }

    #[tokio::test]
    async fn test_rate_limited_body_carries_seconds_left() {
        let response = AppError::rate_limited(42).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "error");
        assert_eq!(body["code"], "RATE_LIMITED");
        assert_eq!(body["seconds_left"], 42);
    }
}

mod result_type_tests {
    use error::{AppError, Result, ResultExt};

    #[test]
    fn test_result_ok() {
        let result: Result<i32> = Ok(42);
        assert_eq!(result.unwrap(), 42);
    }

    #[test]
    fn test_question_mark_from_db_err() {
        fn inner() -> Result<()> {
            Err(sea_orm::DbErr::Custom("boom".to_string()))?;
            Ok(())
        }
        let err = inner().unwrap_err();
        assert!(matches!(err, AppError::Database { .. }));
    }

    #[test]
    fn test_with_context_keeps_variant() {
        let result: Result<i32> = Err(AppError::gone("code expired"));
        let err = result.with_context("redeeming").unwrap_err();
        assert!(matches!(err, AppError::Gone { .. }));
        assert_eq!(err.message(), "redeeming: code expired");
    }
}
