//! Users Entity
//!
//! Represents account holders with authentication and profile information.
//! The `slug` column is always derived from `username`, never client-supplied.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::slug::Sluggable;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:            Uuid,
    #[sea_orm(unique)]
    pub email:         String,
    #[sea_orm(unique)]
    pub username:      String,
    #[sea_orm(unique)]
    pub slug:          String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name:    Option<String>,
    pub last_name:     Option<String>,
    pub image_url:     Option<String>,
    pub is_verified:   bool,
    pub is_staff:      bool,
    pub is_active:     bool,
    pub created_at:    chrono::DateTime<chrono::Utc>,
    pub updated_at:    chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::email_verifications::Entity")]
    EmailVerifications,
    #[sea_orm(has_many = "super::refresh_tokens::Entity")]
    RefreshTokens,
    #[sea_orm(has_many = "super::password_reset_tokens::Entity")]
    PasswordResetTokens,
    #[sea_orm(has_many = "super::recipe_bookmarks::Entity")]
    RecipeBookmarks,
    #[sea_orm(has_many = "super::recipe_comments::Entity")]
    RecipeComments,
}

impl Related<super::email_verifications::Entity> for Entity {
    fn to() -> RelationDef { Relation::EmailVerifications.def() }
}

impl Related<super::refresh_tokens::Entity> for Entity {
    fn to() -> RelationDef { Relation::RefreshTokens.def() }
}

impl Related<super::password_reset_tokens::Entity> for Entity {
    fn to() -> RelationDef { Relation::PasswordResetTokens.def() }
}

impl Related<super::recipe_bookmarks::Entity> for Entity {
    fn to() -> RelationDef { Relation::RecipeBookmarks.def() }
}

impl Related<super::recipe_comments::Entity> for Entity {
    fn to() -> RelationDef { Relation::RecipeComments.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Sluggable for Model {
    fn slug(&self) -> &str { &self.slug }

    fn slug_source(&self) -> &str { &self.username }
}

impl Model {
    /// Display name for rendering emails: "First Last" when set, otherwise
    /// the username.
    #[must_use]
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.clone(),
            _ => self.username.clone(),
        }
    }
}
