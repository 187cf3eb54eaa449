//! # Catalog
//!
//! Categories, recipes, and ingredients. Reads are public and cached;
//! writes are staff-only.

pub mod categories;
pub mod recipes;

use error::{AppError, Result};

use crate::middleware::auth::AuthenticatedUser;

/// Catalog mutation requires the staff flag.
pub fn require_staff(user: &AuthenticatedUser) -> Result<()> {
    if user.is_staff {
        Ok(())
    }
    else {
        Err(AppError::forbidden("Staff privileges required"))
    }
}
