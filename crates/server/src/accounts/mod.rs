//! # Accounts
//!
//! Registration, login, profile management, email verification, and
//! password reset.

pub mod handlers;
pub mod password_reset;
pub mod verification;
