//! # API Router Configuration
//!
//! Configures API routes for the Ladle application.

use axum::{
    extract::{Extension, Path, Query, State as AxumState},
    http::{HeaderMap, StatusCode},
    middleware,
    routing::{delete, get, patch, post},
    Json,
    Router,
};
use error::{ApiResponse, AppError, Result};
use uuid::Uuid;

use crate::{
    dto::{
        accounts::{
            AuthResponse,
            ChangePasswordRequest,
            LoginRequest,
            PasswordResetConfirmRequest,
            PasswordResetRequest,
            RefreshRequest,
            RegistrationRequest,
            UpdateProfileRequest,
            UserResponse,
            VerificationResponse,
        },
        catalog::{CategoryRequest, ListQuery, RecipeDetail, RecipeListQuery, RecipeRequest, RecipeSummary},
        interactions::{BookmarkResponse, CommentListQuery, CommentResponse, CreateBookmarkRequest, CreateCommentRequest},
    },
    middleware::auth::AuthenticatedUser,
    utils::client_ip,
    AppState,
};

/// Creates the API router with all routes
pub fn create_router(state: AppState) -> Router {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .route("/api/v1/accounts/logout", post(logout_handler))
        .route("/api/v1/accounts/me", get(me_handler).patch(update_me_handler))
        .route("/api/v1/accounts/password/change", post(change_password_handler))
        .route("/api/v1/accounts/verification/send/:email", post(send_verification_handler))
        .route("/api/v1/accounts/verify/:email/:code", post(redeem_verification_handler))
        .route("/api/v1/categories", post(create_category_handler))
        .route(
            "/api/v1/categories/:id",
            patch(update_category_handler).delete(delete_category_handler),
        )
        .route("/api/v1/recipes", post(create_recipe_handler))
        .route(
            "/api/v1/recipes/:id",
            patch(update_recipe_handler).delete(delete_recipe_handler),
        )
        .route("/api/v1/comments", post(create_comment_handler))
        .route("/api/v1/bookmarks", get(list_bookmarks_handler).post(add_bookmark_handler))
        .route("/api/v1/bookmarks/:recipe_id", delete(remove_bookmark_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::auth::auth_middleware,
        ));

    // Public routes that don't require authentication
    let public_routes = Router::new()
        .route("/api/v1/accounts/registration", post(registration_handler))
        .route("/api/v1/accounts/login", post(login_handler))
        .route("/api/v1/accounts/refresh", post(refresh_handler))
        .route("/api/v1/accounts/password/reset", post(password_reset_handler))
        .route(
            "/api/v1/accounts/password/reset/confirm",
            post(password_reset_confirm_handler),
        )
        .route("/api/v1/categories", get(list_categories_handler))
        .route("/api/v1/recipes", get(list_recipes_handler))
        .route("/api/v1/recipes/popular", get(popular_recipes_handler))
        .route("/api/v1/recipes/:id", get(recipe_detail_handler))
        .route("/api/v1/comments", get(list_comments_handler));

    public_routes.merge(protected_routes).with_state(state)
}

// Accounts

async fn registration_handler(
    AxumState(state): AxumState<AppState>,
    Json(req): Json<RegistrationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>)> {
    let response = crate::accounts::handlers::register(&state, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))))
}

async fn login_handler(
    AxumState(state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>> {
    let response = crate::accounts::handlers::login(&state, req).await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn refresh_handler(
    AxumState(state): AxumState<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>> {
    let response = crate::accounts::handlers::refresh(&state, req).await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn logout_handler(
    AxumState(state): AxumState<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> Result<StatusCode> {
    crate::accounts::handlers::logout(&state, &caller).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn me_handler(
    AxumState(state): AxumState<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<UserResponse>>> {
    let response = crate::accounts::handlers::me(&state, &caller).await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn update_me_handler(
    AxumState(state): AxumState<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserResponse>>> {
    let response = crate::accounts::handlers::update_me(&state, &caller, req).await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn change_password_handler(
    AxumState(state): AxumState<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<StatusCode> {
    crate::accounts::handlers::change_password(&state, &caller, req).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn password_reset_handler(
    AxumState(state): AxumState<AppState>,
    Json(req): Json<PasswordResetRequest>,
) -> Result<StatusCode> {
    crate::accounts::password_reset::request_reset(&state, req).await?;
    Ok(StatusCode::ACCEPTED)
}

async fn password_reset_confirm_handler(
    AxumState(state): AxumState<AppState>,
    Json(req): Json<PasswordResetConfirmRequest>,
) -> Result<StatusCode> {
    crate::accounts::password_reset::confirm_reset(&state, req).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Verification

async fn send_verification_handler(
    AxumState(state): AxumState<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(email): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<VerificationResponse>>)> {
    let record = crate::accounts::verification::request_verification(
        &state.db,
        &state.mailer,
        &state.config.verification,
        &caller,
        &email,
    )
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(VerificationResponse::from(record))),
    ))
}

async fn redeem_verification_handler(
    AxumState(state): AxumState<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path((email, code)): Path<(String, String)>,
) -> Result<StatusCode> {
    // A malformed code can never match an issued one, so it reads as absent.
    let code = Uuid::parse_str(&code).map_err(|_| AppError::not_found("Verification code not found"))?;
    crate::accounts::verification::redeem(&state.db, &caller, &email, code).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Catalog

async fn list_categories_handler(
    AxumState(state): AxumState<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<entity::categories::Model>>>> {
    let (items, meta) = crate::catalog::categories::list(&state, query).await?;
    Ok(Json(ApiResponse::paginated(items, meta)))
}

async fn create_category_handler(
    AxumState(state): AxumState<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Json(req): Json<CategoryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<entity::categories::Model>>)> {
    crate::catalog::require_staff(&caller)?;
    let category = crate::catalog::categories::create(&state, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(category))))
}

async fn update_category_handler(
    AxumState(state): AxumState<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    Json(req): Json<CategoryRequest>,
) -> Result<Json<ApiResponse<entity::categories::Model>>> {
    crate::catalog::require_staff(&caller)?;
    let category = crate::catalog::categories::update(&state, id, req).await?;
    Ok(Json(ApiResponse::success(category)))
}

async fn delete_category_handler(
    AxumState(state): AxumState<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    crate::catalog::require_staff(&caller)?;
    crate::catalog::categories::delete(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_recipes_handler(
    AxumState(state): AxumState<AppState>,
    Query(query): Query<RecipeListQuery>,
) -> Result<Json<ApiResponse<Vec<RecipeSummary>>>> {
    let (items, meta) = crate::catalog::recipes::list(&state, query).await?;
    Ok(Json(ApiResponse::paginated(items, meta)))
}

async fn popular_recipes_handler(
    AxumState(state): AxumState<AppState>,
) -> Result<Json<ApiResponse<Vec<RecipeSummary>>>> {
    let items = crate::catalog::recipes::popular(&state).await?;
    Ok(Json(ApiResponse::success(items)))
}

async fn recipe_detail_handler(
    AxumState(state): AxumState<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<RecipeDetail>>> {
    let detail = crate::catalog::recipes::detail(&state, &slug, &client_ip(&headers)).await?;
    Ok(Json(ApiResponse::success(detail)))
}

async fn create_recipe_handler(
    AxumState(state): AxumState<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Json(req): Json<RecipeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<entity::recipes::Model>>)> {
    crate::catalog::require_staff(&caller)?;
    let recipe = crate::catalog::recipes::create(&state, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(recipe))))
}

async fn update_recipe_handler(
    AxumState(state): AxumState<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    Json(req): Json<RecipeRequest>,
) -> Result<Json<ApiResponse<entity::recipes::Model>>> {
    crate::catalog::require_staff(&caller)?;
    let recipe = crate::catalog::recipes::update(&state, id, req).await?;
    Ok(Json(ApiResponse::success(recipe)))
}

async fn delete_recipe_handler(
    AxumState(state): AxumState<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    crate::catalog::require_staff(&caller)?;
    crate::catalog::recipes::delete(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Interactions

async fn list_comments_handler(
    AxumState(state): AxumState<AppState>,
    Query(query): Query<CommentListQuery>,
) -> Result<Json<ApiResponse<Vec<CommentResponse>>>> {
    let (items, meta) = crate::interactions::comments::list(&state, query).await?;
    Ok(Json(ApiResponse::paginated(items, meta)))
}

async fn create_comment_handler(
    AxumState(state): AxumState<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Json(req): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CommentResponse>>)> {
    let comment = crate::interactions::comments::create(&state, &caller, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(comment))))
}

async fn list_bookmarks_handler(
    AxumState(state): AxumState<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<BookmarkResponse>>>> {
    let (items, meta) = crate::interactions::bookmarks::list(&state, &caller, query).await?;
    Ok(Json(ApiResponse::paginated(items, meta)))
}

async fn add_bookmark_handler(
    AxumState(state): AxumState<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Json(req): Json<CreateBookmarkRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BookmarkResponse>>)> {
    let bookmark = crate::interactions::bookmarks::add(&state, &caller, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(bookmark))))
}

async fn remove_bookmark_handler(
    AxumState(state): AxumState<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(recipe_id): Path<i32>,
) -> Result<StatusCode> {
    crate::interactions::bookmarks::remove(&state, &caller, recipe_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Creates the health check router
pub fn create_health_router() -> Router { Router::new().route("/health", get(|| async { "OK" })) }

/// Creates the main application router
pub fn create_app_router(state: AppState) -> Router {
    Router::new()
        .merge(create_health_router())
        .merge(create_router(state))
        .layer(middleware::from_fn(crate::middleware::request_log::request_log_middleware))
}
