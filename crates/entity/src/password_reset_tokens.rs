//! Password Reset Tokens Entity
//!
//! Single-use, expiring tokens. Only the blake3 hash of the emailed token
//! is stored; consumption sets `consumed_at`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "password_reset_tokens")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id:          i32,
    pub user_id:     Uuid,
    #[sea_orm(unique)]
    pub token_hash:  String,
    pub expires_at:  chrono::DateTime<chrono::Utc>,
    pub consumed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at:  chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// A token is redeemable only once and only before its expiry.
    #[must_use]
    pub fn is_redeemable(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        self.consumed_at.is_none() && self.expires_at > now
    }
}
