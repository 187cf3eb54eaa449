//! # Logging Macros
//!
//! Convenience macros for structured logging.
//! These macros provide consistent targets and structured fields.

/// Log an API request with method, path, and status.
#[macro_export]
macro_rules! log_api_request {
    ($method:expr, $path:expr, $status:expr, $duration:expr) => {
        tracing::info!(
            target: "api",
            method = %$method,
            path = %$path,
            status = %$status,
            duration_ms = %$duration,
            "API request"
        )
    };
}

/// Log a cache operation with key and hit/miss result.
#[macro_export]
macro_rules! log_cache_operation {
    ($operation:expr, $key:expr, $hit:expr) => {
        tracing::debug!(
            target: "cache",
            operation = %$operation,
            key = %$key,
            hit = $hit,
            "Cache operation"
        )
    };
}

/// Log an authentication event.
#[macro_export]
macro_rules! log_auth_event {
    ($event:expr, $user_id:expr, $success:expr) => {
        tracing::info!(
            target: "auth",
            event = %$event,
            user_id = %$user_id,
            success = $success,
            "Authentication event"
        )
    };
}

/// Log a mail dispatch event.
#[macro_export]
macro_rules! log_mail_event {
    ($event:expr, $recipient:expr) => {
        tracing::info!(
            target: "mail",
            event = %$event,
            recipient = %$recipient,
            "Mail event"
        )
    };
}
