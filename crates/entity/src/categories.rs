//! Categories Entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::slug::Sluggable;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id:         i32,
    #[sea_orm(unique)]
    pub name:       String,
    #[sea_orm(unique)]
    pub slug:       String,
    pub image_url:  Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::recipes::Entity")]
    Recipes,
}

impl Related<super::recipes::Entity> for Entity {
    fn to() -> RelationDef { Relation::Recipes.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Sluggable for Model {
    fn slug(&self) -> &str { &self.slug }

    fn slug_source(&self) -> &str { &self.name }
}
