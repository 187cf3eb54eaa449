//! # HTTP Middleware
//!
//! Request-level middleware applied by the router.

pub mod auth;
pub mod request_log;
