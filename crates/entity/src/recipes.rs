//! Recipes Entity
//!
//! `views` counts detail-page reads, deduplicated per client IP per minute
//! at the handler layer.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::slug::Sluggable;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "recipes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id:                  i32,
    pub name:                String,
    #[sea_orm(unique)]
    pub slug:                String,
    #[sea_orm(column_type = "Text")]
    pub description:         String,
    #[sea_orm(column_type = "Text")]
    pub cooking_description: String,
    pub image_url:           Option<String>,
    pub category_id:         i32,
    pub views:               i64,
    pub created_at:          chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_delete = "Cascade"
    )]
    Category,
    #[sea_orm(has_many = "super::ingredients::Entity")]
    Ingredients,
    #[sea_orm(has_many = "super::recipe_bookmarks::Entity")]
    Bookmarks,
    #[sea_orm(has_many = "super::recipe_comments::Entity")]
    Comments,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef { Relation::Category.def() }
}

impl Related<super::ingredients::Entity> for Entity {
    fn to() -> RelationDef { Relation::Ingredients.def() }
}

impl Related<super::recipe_bookmarks::Entity> for Entity {
    fn to() -> RelationDef { Relation::Bookmarks.def() }
}

impl Related<super::recipe_comments::Entity> for Entity {
    fn to() -> RelationDef { Relation::Comments.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Sluggable for Model {
    fn slug(&self) -> &str { &self.slug }

    fn slug_source(&self) -> &str { &self.name }
}
