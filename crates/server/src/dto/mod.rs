//! # Data Transfer Objects Module
//!
//! Request and response types for API endpoints.

pub mod accounts;
pub mod catalog;
pub mod interactions;
