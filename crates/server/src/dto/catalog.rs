//! # Catalog Data Transfer Objects
//!
//! Request and response types for categories, recipes, and ingredients.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Common pagination query parameters
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ListQuery {
    pub page:     Option<u64>,
    pub per_page: Option<u64>,
}

/// Query parameters for the recipe list.
///
/// `search` wins over `category_slug` when both are present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeListQuery {
    pub page:          Option<u64>,
    pub per_page:      Option<u64>,
    pub search:        Option<String>,
    pub category_slug: Option<String>,
}

/// Request body for creating or updating a category
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CategoryRequest {
    #[validate(length(min = 1, max = 32, message = "Name must be between 1 and 32 characters"))]
    pub name: String,

    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,
}

/// Request body for creating or updating a recipe.
///
/// `ingredients` replaces the full ingredient list on update.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct RecipeRequest {
    #[validate(length(min = 1, max = 128, message = "Name must be between 1 and 128 characters"))]
    pub name: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[validate(length(min = 1, message = "Cooking description is required"))]
    pub cooking_description: String,

    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,

    pub category_id: i32,

    #[validate(length(min = 1, message = "At least one ingredient is required"))]
    pub ingredients: Vec<String>,
}

/// Compact recipe representation for list endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub id:          i32,
    pub name:        String,
    pub slug:        String,
    pub image_url:   Option<String>,
    pub category_id: i32,
    pub views:       i64,
    pub created_at:  chrono::DateTime<chrono::Utc>,
}

impl From<entity::recipes::Model> for RecipeSummary {
    fn from(recipe: entity::recipes::Model) -> Self {
        Self {
            id:          recipe.id,
            name:        recipe.name,
            slug:        recipe.slug,
            image_url:   recipe.image_url,
            category_id: recipe.category_id,
            views:       recipe.views,
            created_at:  recipe.created_at,
        }
    }
}

/// Full recipe representation for the detail endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeDetail {
    pub id:                  i32,
    pub name:                String,
    pub slug:                String,
    pub description:         String,
    pub cooking_description: String,
    pub image_url:           Option<String>,
    pub category_id:         i32,
    pub views:               i64,
    pub created_at:          chrono::DateTime<chrono::Utc>,
    pub ingredients:         Vec<String>,
    pub bookmark_count:      u64,
    pub comment_count:       u64,
}

impl RecipeDetail {
    #[must_use]
    pub fn from_parts(
        recipe: entity::recipes::Model,
        ingredients: Vec<entity::ingredients::Model>,
        bookmark_count: u64,
        comment_count: u64,
    ) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name,
            slug: recipe.slug,
            description: recipe.description,
            cooking_description: recipe.cooking_description,
            image_url: recipe.image_url,
            category_id: recipe.category_id,
            views: recipe.views,
            created_at: recipe.created_at,
            ingredients: ingredients.into_iter().map(|i| i.name).collect(),
            bookmark_count,
            comment_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_name_bounds() {
        let req = CategoryRequest {
            name:      "x".repeat(33),
            image_url: None,
        };
        assert!(req.validate().is_err());

        let req = CategoryRequest {
            name:      "Soups".to_string(),
            image_url: None,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_recipe_requires_ingredients() {
        let req = RecipeRequest {
            name:                "Borscht".to_string(),
            description:         "Beet soup".to_string(),
            cooking_description: "Boil everything".to_string(),
            image_url:           None,
            category_id:         1,
            ingredients:         vec![],
        };
        assert!(req.validate().is_err());
    }
}
