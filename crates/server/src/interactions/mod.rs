//! # Interactions
//!
//! Bookmarks and comments, always scoped to the authenticated caller.

pub mod bookmarks;
pub mod comments;
