//! # Category Handlers
//!
//! The list is read through the cache; mutations go straight to the
//! database and tolerate a stale cache until the TTL lapses.

use chrono::Utc;
use entity::{categories, slug::slugify};
use error::{AppError, PaginationMeta, Result};
use sea_orm::{prelude::*, ActiveValue::NotSet, IntoActiveModel, QueryFilter, QueryOrder, Set};
use validator::Validate;

use crate::{
    cache::Cache,
    dto::catalog::{CategoryRequest, ListQuery},
    utils::{clamp_pagination, paginate_slice},
    AppState,
};

const CACHE_KEY: &str = "categories:all";

async fn load_all(state: &AppState) -> Result<Vec<categories::Model>> {
    let db = state.db.clone();
    Cache::new(state.redis.clone())
        .get_or_compute(CACHE_KEY, state.config.cache.categories_ttl, move || {
            async move {
                let all = categories::Entity::find()
                    .order_by_asc(categories::Column::Name)
                    .all(&db)
                    .await?;
                Ok(all)
            }
        })
        .await
}

/// Name-ordered category page.
pub async fn list(state: &AppState, query: ListQuery) -> Result<(Vec<categories::Model>, PaginationMeta)> {
    let all = load_all(state).await?;

    let (page, per_page) = clamp_pagination(query.page, query.per_page, &state.config.pagination);
    let meta = PaginationMeta::new(page, per_page, all.len() as u64);
    let items = paginate_slice(&all, &meta);

    Ok((items, meta))
}

/// Creates a category. Staff only, enforced by the caller.
pub async fn create(state: &AppState, req: CategoryRequest) -> Result<categories::Model> {
    req.validate()?;

    let slug = slugify(&req.name);
    let existing = categories::Entity::find()
        .filter(categories::Column::Slug.eq(&slug))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::conflict("A category with this name already exists"));
    }

    let category = categories::ActiveModel {
        id:         NotSet,
        name:       Set(req.name),
        slug:       Set(slug),
        image_url:  Set(req.image_url),
        created_at: Set(Utc::now()),
    }
    .insert(&state.db)
    .await?;

    Ok(category)
}

/// Updates a category, recomputing the slug when the name changes.
pub async fn update(state: &AppState, id: i32, req: CategoryRequest) -> Result<categories::Model> {
    req.validate()?;

    let category = categories::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Category not found"))?;

    let slug = slugify(&req.name);
    if slug != category.slug {
        let clash = categories::Entity::find()
            .filter(categories::Column::Slug.eq(&slug))
            .one(&state.db)
            .await?;
        if clash.is_some() {
            return Err(AppError::conflict("A category with this name already exists"));
        }
    }

    let mut active = category.into_active_model();
    active.name = Set(req.name);
    active.slug = Set(slug);
    active.image_url = Set(req.image_url);
    let updated = active.update(&state.db).await?;

    Ok(updated)
}

/// Deletes a category and, via cascade, its recipes.
pub async fn delete(state: &AppState, id: i32) -> Result<()> {
    let result = categories::Entity::delete_by_id(id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found("Category not found"));
    }
    Ok(())
}
