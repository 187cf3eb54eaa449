//! Recipe Comments Entity
//!
//! `author_id` is nullable: deleting a user keeps their comments with the
//! author cleared.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Maximum comment length in characters.
pub const MAX_COMMENT_LEN: usize = 516;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "recipe_comments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id:         i32,
    pub recipe_id:  i32,
    pub author_id:  Option<Uuid>,
    #[sea_orm(column_type = "Text")]
    pub text:       String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::recipes::Entity",
        from = "Column::RecipeId",
        to = "super::recipes::Column::Id",
        on_delete = "Cascade"
    )]
    Recipe,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::AuthorId",
        to = "super::users::Column::Id",
        on_delete = "SetNull"
    )]
    Author,
}

impl Related<super::recipes::Entity> for Entity {
    fn to() -> RelationDef { Relation::Recipe.def() }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef { Relation::Author.def() }
}

impl ActiveModelBehavior for ActiveModel {}
