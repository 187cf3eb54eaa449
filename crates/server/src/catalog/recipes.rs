//! # Recipe Handlers
//!
//! The list endpoints read a cached base set and filter in memory; the
//! detail endpoint counts a view at most once per client IP per minute.

use chrono::Utc;
use entity::{categories, ingredients, recipe_bookmarks, recipe_comments, recipes, slug::slugify};
use error::{AppError, PaginationMeta, Result};
use sea_orm::{
    prelude::*,
    ActiveValue::NotSet,
    IntoActiveModel,
    PaginatorTrait,
    QueryFilter,
    QueryOrder,
    QuerySelect,
    Set,
};
use validator::Validate;

use crate::{
    cache::Cache,
    dto::catalog::{RecipeDetail, RecipeListQuery, RecipeRequest, RecipeSummary},
    utils::{clamp_pagination, paginate_slice},
    AppState,
};

const CACHE_KEY_ALL: &str = "recipes:all";
const CACHE_KEY_POPULAR: &str = "recipes:popular";

/// How many most-bookmarked recipes the popular endpoint returns.
const POPULAR_COUNT: usize = 3;

/// One view per client IP per this many seconds.
const VIEW_WINDOW_SECS: u64 = 60;

async fn load_all(state: &AppState) -> Result<Vec<recipes::Model>> {
    let db = state.db.clone();
    Cache::new(state.redis.clone())
        .get_or_compute(CACHE_KEY_ALL, state.config.cache.recipes_ttl, move || {
            async move {
                let all = recipes::Entity::find()
                    .order_by_asc(recipes::Column::Name)
                    .all(&db)
                    .await?;
                Ok(all)
            }
        })
        .await
}

/// Name-ordered recipe page, filtered by search text or category slug.
/// Search wins when both are supplied.
pub async fn list(state: &AppState, query: RecipeListQuery) -> Result<(Vec<RecipeSummary>, PaginationMeta)> {
    let all = load_all(state).await?;

    let filtered: Vec<recipes::Model> = if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
        let needle = search.to_lowercase();
        all.into_iter()
            .filter(|r| {
                r.name.to_lowercase().contains(&needle) || r.description.to_lowercase().contains(&needle)
            })
            .collect()
    }
    else if let Some(category_slug) = query.category_slug.as_deref().filter(|s| !s.is_empty()) {
        let category = categories::Entity::find()
            .filter(categories::Column::Slug.eq(category_slug))
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::not_found("Category not found"))?;
        all.into_iter().filter(|r| r.category_id == category.id).collect()
    }
    else {
        all
    };

    let (page, per_page) = clamp_pagination(query.page, query.per_page, &state.config.pagination);
    let meta = PaginationMeta::new(page, per_page, filtered.len() as u64);
    let items = paginate_slice(&filtered, &meta)
        .into_iter()
        .map(RecipeSummary::from)
        .collect();

    Ok((items, meta))
}

/// The most-bookmarked recipes, cached for a day.
pub async fn popular(state: &AppState) -> Result<Vec<RecipeSummary>> {
    let db = state.db.clone();
    Cache::new(state.redis.clone())
        .get_or_compute(CACHE_KEY_POPULAR, state.config.cache.popular_ttl, move || {
            async move {
                let counts: Vec<(i32, i64)> = recipe_bookmarks::Entity::find()
                    .select_only()
                    .column(recipe_bookmarks::Column::RecipeId)
                    .column_as(recipe_bookmarks::Column::Id.count(), "bookmarks")
                    .group_by(recipe_bookmarks::Column::RecipeId)
                    .into_tuple()
                    .all(&db)
                    .await?;

                let mut counts = counts;
                counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
                counts.truncate(POPULAR_COUNT);

                let mut result = Vec::with_capacity(counts.len());
                for (recipe_id, _) in counts {
                    if let Some(recipe) = recipes::Entity::find_by_id(recipe_id).one(&db).await? {
                        result.push(RecipeSummary::from(recipe));
                    }
                }
                Ok(result)
            }
        })
        .await
}

/// Recipe detail by slug. Increments the view counter at most once per
/// `client_ip` per minute; a Redis outage skips the increment rather than
/// inflating the count.
pub async fn detail(state: &AppState, slug: &str, client_ip: &str) -> Result<RecipeDetail> {
    let mut recipe = recipes::Entity::find()
        .filter(recipes::Column::Slug.eq(slug))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Recipe not found"))?;

    let view_key = format!("views:{}:{}", recipe.id, client_ip);
    if Cache::new(state.redis.clone()).claim_window(&view_key, VIEW_WINDOW_SECS).await {
        recipes::Entity::update_many()
            .col_expr(recipes::Column::Views, Expr::col(recipes::Column::Views).add(1))
            .filter(recipes::Column::Id.eq(recipe.id))
            .exec(&state.db)
            .await?;
        recipe.views += 1;
    }

    let recipe_ingredients = ingredients::Entity::find()
        .filter(ingredients::Column::RecipeId.eq(recipe.id))
        .all(&state.db)
        .await?;

    let bookmark_count = recipe_bookmarks::Entity::find()
        .filter(recipe_bookmarks::Column::RecipeId.eq(recipe.id))
        .count(&state.db)
        .await?;
    let comment_count = recipe_comments::Entity::find()
        .filter(recipe_comments::Column::RecipeId.eq(recipe.id))
        .count(&state.db)
        .await?;

    Ok(RecipeDetail::from_parts(
        recipe,
        recipe_ingredients,
        bookmark_count,
        comment_count,
    ))
}

async fn replace_ingredients(db: &sea_orm::DbConn, recipe_id: i32, names: Vec<String>) -> Result<()> {
    ingredients::Entity::delete_many()
        .filter(ingredients::Column::RecipeId.eq(recipe_id))
        .exec(db)
        .await?;

    for name in names {
        ingredients::ActiveModel {
            id:        NotSet,
            name:      Set(name),
            recipe_id: Set(recipe_id),
        }
        .insert(db)
        .await?;
    }

    Ok(())
}

/// Creates a recipe with its ingredient list. Staff only, enforced by the
/// caller.
pub async fn create(state: &AppState, req: RecipeRequest) -> Result<recipes::Model> {
    req.validate()?;

    let category = categories::Entity::find_by_id(req.category_id).one(&state.db).await?;
    if category.is_none() {
        return Err(AppError::validation("category_id: no such category"));
    }

    let slug = slugify(&req.name);
    let clash = recipes::Entity::find()
        .filter(recipes::Column::Slug.eq(&slug))
        .one(&state.db)
        .await?;
    if clash.is_some() {
        return Err(AppError::conflict("A recipe with this name already exists"));
    }

    let recipe = recipes::ActiveModel {
        id:                  NotSet,
        name:                Set(req.name),
        slug:                Set(slug),
        description:         Set(req.description),
        cooking_description: Set(req.cooking_description),
        image_url:           Set(req.image_url),
        category_id:         Set(req.category_id),
        views:               Set(0),
        created_at:          Set(Utc::now()),
    }
    .insert(&state.db)
    .await?;

    replace_ingredients(&state.db, recipe.id, req.ingredients).await?;

    Ok(recipe)
}

/// Updates a recipe, recomputing the slug on rename and replacing the
/// ingredient list wholesale.
pub async fn update(state: &AppState, id: i32, req: RecipeRequest) -> Result<recipes::Model> {
    req.validate()?;

    let recipe = recipes::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Recipe not found"))?;

    let category = categories::Entity::find_by_id(req.category_id).one(&state.db).await?;
    if category.is_none() {
        return Err(AppError::validation("category_id: no such category"));
    }

    let slug = slugify(&req.name);
    if slug != recipe.slug {
        let clash = recipes::Entity::find()
            .filter(recipes::Column::Slug.eq(&slug))
            .one(&state.db)
            .await?;
        if clash.is_some() {
            return Err(AppError::conflict("A recipe with this name already exists"));
        }
    }

    let recipe_id = recipe.id;
    let mut active = recipe.into_active_model();
    active.name = Set(req.name);
    active.slug = Set(slug);
    active.description = Set(req.description);
    active.cooking_description = Set(req.cooking_description);
    active.image_url = Set(req.image_url);
    active.category_id = Set(req.category_id);
    let updated = active.update(&state.db).await?;

    replace_ingredients(&state.db, recipe_id, req.ingredients).await?;

    Ok(updated)
}

/// Deletes a recipe and, via cascade, its ingredients, bookmarks, and
/// comments.
pub async fn delete(state: &AppState, id: i32) -> Result<()> {
    let result = recipes::Entity::delete_by_id(id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found("Recipe not found"));
    }
    Ok(())
}
