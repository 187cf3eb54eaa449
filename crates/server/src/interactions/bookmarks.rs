//! # Bookmark Handlers

use chrono::Utc;
use entity::{recipe_bookmarks, recipes};
use error::{AppError, PaginationMeta, Result};
use sea_orm::{prelude::*, ActiveValue::NotSet, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set};

use crate::{
    dto::{
        catalog::{ListQuery, RecipeSummary},
        interactions::{BookmarkResponse, CreateBookmarkRequest},
    },
    middleware::auth::AuthenticatedUser,
    utils::clamp_pagination,
    AppState,
};

/// The caller's bookmarks, newest first.
pub async fn list(
    state: &AppState,
    caller: &AuthenticatedUser,
    query: ListQuery,
) -> Result<(Vec<BookmarkResponse>, PaginationMeta)> {
    let (page, per_page) = clamp_pagination(query.page, query.per_page, &state.config.pagination);

    let total = recipe_bookmarks::Entity::find()
        .filter(recipe_bookmarks::Column::UserId.eq(caller.id))
        .count(&state.db)
        .await?;
    let meta = PaginationMeta::new(page, per_page, total);

    let rows = recipe_bookmarks::Entity::find()
        .filter(recipe_bookmarks::Column::UserId.eq(caller.id))
        .order_by_desc(recipe_bookmarks::Column::CreatedAt)
        .offset(meta.offset())
        .limit(meta.limit())
        .find_also_related(recipes::Entity)
        .all(&state.db)
        .await?;

    let items = rows
        .into_iter()
        .filter_map(|(bookmark, recipe)| {
            recipe.map(|recipe| {
                BookmarkResponse {
                    id:         bookmark.id,
                    recipe:     RecipeSummary::from(recipe),
                    created_at: bookmark.created_at,
                }
            })
        })
        .collect();

    Ok((items, meta))
}

/// Adds a bookmark. Idempotent: re-bookmarking returns the existing row.
pub async fn add(state: &AppState, caller: &AuthenticatedUser, req: CreateBookmarkRequest) -> Result<BookmarkResponse> {
    let recipe = recipes::Entity::find_by_id(req.recipe_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Recipe not found"))?;

    let existing = recipe_bookmarks::Entity::find()
        .filter(recipe_bookmarks::Column::RecipeId.eq(req.recipe_id))
        .filter(recipe_bookmarks::Column::UserId.eq(caller.id))
        .one(&state.db)
        .await?;

    let bookmark = match existing {
        Some(bookmark) => bookmark,
        None => {
            recipe_bookmarks::ActiveModel {
                id:         NotSet,
                recipe_id:  Set(req.recipe_id),
                user_id:    Set(caller.id),
                created_at: Set(Utc::now()),
            }
            .insert(&state.db)
            .await?
        },
    };

    Ok(BookmarkResponse {
        id:         bookmark.id,
        recipe:     RecipeSummary::from(recipe),
        created_at: bookmark.created_at,
    })
}

/// Removes a bookmark. Idempotent: deleting an absent bookmark succeeds.
pub async fn remove(state: &AppState, caller: &AuthenticatedUser, recipe_id: i32) -> Result<()> {
    recipe_bookmarks::Entity::delete_many()
        .filter(recipe_bookmarks::Column::RecipeId.eq(recipe_id))
        .filter(recipe_bookmarks::Column::UserId.eq(caller.id))
        .exec(&state.db)
        .await?;
    Ok(())
}
