//! Entity definitions for Ladle
//!
//! This crate contains Sea-ORM entity definitions for the database models,
//! plus the slug derivation shared by users, categories, and recipes.

pub mod slug;
pub use slug::{slugify, Sluggable};

pub mod users;
pub use users::Entity as Users;
pub mod email_verifications;
pub use email_verifications::Entity as EmailVerifications;
pub mod refresh_tokens;
pub use refresh_tokens::Entity as RefreshTokens;
pub mod password_reset_tokens;
pub use password_reset_tokens::Entity as PasswordResetTokens;
pub mod categories;
pub use categories::Entity as Categories;
pub mod recipes;
pub use recipes::Entity as Recipes;
pub mod ingredients;
pub use ingredients::Entity as Ingredients;
pub mod recipe_bookmarks;
pub use recipe_bookmarks::Entity as RecipeBookmarks;
pub mod recipe_comments;
pub use recipe_comments::Entity as RecipeComments;
