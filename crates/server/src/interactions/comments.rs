//! # Comment Handlers

use std::collections::HashMap;

use chrono::Utc;
use entity::{recipe_comments, recipes, users};
use error::{AppError, PaginationMeta, Result};
use sea_orm::{prelude::*, ActiveValue::NotSet, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::interactions::{CommentListQuery, CommentResponse, CreateCommentRequest},
    middleware::auth::AuthenticatedUser,
    utils::clamp_pagination,
    AppState,
};

/// Comments on a recipe, newest first. Authors are resolved to usernames
/// in one query; deleted accounts come back as `None`.
pub async fn list(state: &AppState, query: CommentListQuery) -> Result<(Vec<CommentResponse>, PaginationMeta)> {
    let recipe = recipes::Entity::find_by_id(query.recipe_id).one(&state.db).await?;
    if recipe.is_none() {
        return Err(AppError::not_found("Recipe not found"));
    }

    let (page, per_page) = clamp_pagination(query.page, query.per_page, &state.config.pagination);

    let total = recipe_comments::Entity::find()
        .filter(recipe_comments::Column::RecipeId.eq(query.recipe_id))
        .count(&state.db)
        .await?;
    let meta = PaginationMeta::new(page, per_page, total);

    let comments = recipe_comments::Entity::find()
        .filter(recipe_comments::Column::RecipeId.eq(query.recipe_id))
        .order_by_desc(recipe_comments::Column::CreatedAt)
        .offset(meta.offset())
        .limit(meta.limit())
        .all(&state.db)
        .await?;

    let author_ids: Vec<Uuid> = comments.iter().filter_map(|c| c.author_id).collect();
    let authors: HashMap<Uuid, String> = if author_ids.is_empty() {
        HashMap::new()
    }
    else {
        users::Entity::find()
            .filter(users::Column::Id.is_in(author_ids))
            .all(&state.db)
            .await?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect()
    };

    let items = comments
        .into_iter()
        .map(|comment| {
            let author = comment.author_id.and_then(|id| authors.get(&id).cloned());
            CommentResponse::from_parts(comment, author)
        })
        .collect();

    Ok((items, meta))
}

/// Posts a comment as the authenticated caller.
pub async fn create(state: &AppState, caller: &AuthenticatedUser, req: CreateCommentRequest) -> Result<CommentResponse> {
    req.validate()?;

    let recipe = recipes::Entity::find_by_id(req.recipe_id).one(&state.db).await?;
    if recipe.is_none() {
        return Err(AppError::not_found("Recipe not found"));
    }

    let comment = recipe_comments::ActiveModel {
        id:         NotSet,
        recipe_id:  Set(req.recipe_id),
        author_id:  Set(Some(caller.id)),
        text:       Set(req.text),
        created_at: Set(Utc::now()),
    }
    .insert(&state.db)
    .await?;

    let author = users::Entity::find_by_id(caller.id)
        .one(&state.db)
        .await?
        .map(|u| u.username);

    Ok(CommentResponse::from_parts(comment, author))
}
