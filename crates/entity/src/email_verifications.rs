//! Email Verifications Entity
//!
//! One row per issued verification code. Rows are append-only: they are
//! never mutated or deleted on redemption, and many may exist per user. The
//! "current" code is the newest unexpired one. Redemption flips
//! `users.is_verified`, not anything here.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "email_verifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:         Uuid,
    /// Random 128-bit code; the only unguessable secret in the flow.
    #[sea_orm(unique)]
    #[serde(skip_serializing)]
    pub code:       Uuid,
    pub user_id:    Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub expiration: chrono::DateTime<chrono::Utc>,
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
    /// Whether the code is past its expiration instant.
    #[must_use]
    pub fn is_expired(&self, now: chrono::DateTime<chrono::Utc>) -> bool { self.expiration <= now }
}
