//! # Interaction Data Transfer Objects
//!
//! Request and response types for bookmarks and comments.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::catalog::RecipeSummary;

/// Query parameters for the comment list
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CommentListQuery {
    pub recipe_id: i32,
    pub page:      Option<u64>,
    pub per_page:  Option<u64>,
}

/// Request body for posting a comment
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateCommentRequest {
    pub recipe_id: i32,

    #[validate(length(min = 1, max = 516, message = "Comment must be between 1 and 516 characters"))]
    pub text: String,
}

/// A comment with its author resolved to a username.
///
/// `author` is `None` when the account was deleted after posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id:         i32,
    pub recipe_id:  i32,
    pub author:     Option<String>,
    pub text:       String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl CommentResponse {
    #[must_use]
    pub fn from_parts(comment: entity::recipe_comments::Model, author: Option<String>) -> Self {
        Self {
            id: comment.id,
            recipe_id: comment.recipe_id,
            author,
            text: comment.text,
            created_at: comment.created_at,
        }
    }
}

/// Request body for adding a bookmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CreateBookmarkRequest {
    pub recipe_id: i32,
}

/// A bookmark joined with its recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkResponse {
    pub id:         i32,
    pub recipe:     RecipeSummary,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
