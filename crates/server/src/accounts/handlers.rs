//! # Account Handlers
//!
//! Registration, login, token refresh, logout, and profile management.

use auth::{hash_password, secrecy::SecretString, validate_password_strength, verify_password};
use chrono::Utc;
use entity::{slug::slugify, users};
use error::{AppError, Result};
use logging::log_auth_event;
use sea_orm::{
    prelude::*,
    sea_query::Func,
    DbConn,
    IntoActiveModel,
    QueryFilter,
    Set,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::accounts::{
        AuthResponse,
        AuthTokens,
        ChangePasswordRequest,
        LoginRequest,
        RefreshRequest,
        RegistrationRequest,
        UpdateProfileRequest,
        UserResponse,
    },
    jwt::create_access_token,
    middleware::auth::AuthenticatedUser,
    refresh_tokens::{
        create_refresh_token,
        generate_refresh_token,
        revoke_all_user_tokens,
        rotate_refresh_token,
    },
    AppState,
};

/// Case-insensitive lookup by username.
async fn find_by_username_ci(db: &DbConn, username: &str) -> Result<Option<users::Model>> {
    let user = users::Entity::find()
        .filter(Expr::expr(Func::lower(Expr::col(users::Column::Username))).eq(username.to_lowercase()))
        .one(db)
        .await?;
    Ok(user)
}

/// Emails are stored lowercased, so equality on the lowered input suffices.
async fn find_by_email(db: &DbConn, email: &str) -> Result<Option<users::Model>> {
    let user = users::Entity::find()
        .filter(users::Column::Email.eq(email.to_lowercase()))
        .one(db)
        .await?;
    Ok(user)
}

fn strength_errors_to_validation(errors: Vec<auth::password::PasswordValidationError>) -> AppError {
    let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
    AppError::validation(format!("password: {}", messages.join(", ")))
}

fn issue_tokens(state: &AppState, user: &users::Model) -> Result<String> {
    create_access_token(&state.config.jwt, user.id, &user.email, user.is_staff)
}

/// Registers a new account.
///
/// Uniqueness of username and email is case-insensitive and checked before
/// any write, so a rejected registration leaves nothing behind.
pub async fn register(state: &AppState, req: RegistrationRequest) -> Result<AuthResponse> {
    req.validate()?;

    let email = req.email.to_lowercase();

    if find_by_email(&state.db, &email).await?.is_some() {
        return Err(AppError::validation("email: already registered"));
    }
    if find_by_username_ci(&state.db, &req.username).await?.is_some() {
        return Err(AppError::validation("username: already taken"));
    }

    validate_password_strength(&req.password, Some(&req.username)).map_err(strength_errors_to_validation)?;

    let password_secret = SecretString::from(req.password);
    let password_hash = hash_password(&password_secret, None)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;

    let now = Utc::now();
    let user = users::ActiveModel {
        id:            Set(Uuid::new_v4()),
        email:         Set(email),
        username:      Set(req.username.clone()),
        slug:          Set(slugify(&req.username)),
        password_hash: Set(auth::secrecy::ExposeSecret::expose_secret(&password_hash).to_string()),
        first_name:    Set(req.first_name),
        last_name:     Set(req.last_name),
        image_url:     Set(None),
        is_verified:   Set(false),
        is_staff:      Set(false),
        is_active:     Set(true),
        created_at:    Set(now),
        updated_at:    Set(now),
    }
    .insert(&state.db)
    .await?;

    let refresh_token = generate_refresh_token();
    create_refresh_token(
        &state.db,
        user.id,
        &refresh_token,
        state.config.jwt.refresh_expiration_seconds,
    )
    .await?;

    log_auth_event!("registered", user.id, true);

    Ok(AuthResponse {
        tokens: AuthTokens {
            access_token: issue_tokens(state, &user)?,
            refresh_token,
            expires_in: state.config.jwt.expiration_seconds,
            token_type: "Bearer".to_string(),
        },
        user:   UserResponse::from(user),
    })
}

/// Logs a user in by username or email.
pub async fn login(state: &AppState, req: LoginRequest) -> Result<AuthResponse> {
    req.validate()?;

    let user = if req.identifier.contains('@') {
        find_by_email(&state.db, &req.identifier).await?
    }
    else {
        find_by_username_ci(&state.db, &req.identifier).await?
    };

    let user = user.ok_or_else(|| AppError::unauthorized("Invalid credentials"))?;

    let password_secret = SecretString::from(req.password);
    verify_password(&password_secret, &user.password_hash).map_err(|_| {
        log_auth_event!("login", user.id, false);
        AppError::unauthorized("Invalid credentials")
    })?;

    if !user.is_active {
        return Err(AppError::unauthorized("Account is disabled"));
    }

    let refresh_token = generate_refresh_token();
    create_refresh_token(
        &state.db,
        user.id,
        &refresh_token,
        state.config.jwt.refresh_expiration_seconds,
    )
    .await?;

    log_auth_event!("login", user.id, true);

    Ok(AuthResponse {
        tokens: AuthTokens {
            access_token: issue_tokens(state, &user)?,
            refresh_token,
            expires_in: state.config.jwt.expiration_seconds,
            token_type: "Bearer".to_string(),
        },
        user:   UserResponse::from(user),
    })
}

/// Rotates a refresh token and issues a fresh access token.
pub async fn refresh(state: &AppState, req: RefreshRequest) -> Result<AuthResponse> {
    req.validate()?;

    let (user_id, refresh_token) = rotate_refresh_token(
        &state.db,
        &req.refresh_token,
        state.config.jwt.refresh_expiration_seconds,
    )
    .await?;

    let user = users::Entity::find_by_id(user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::unauthorized("Account no longer exists"))?;

    if !user.is_active {
        return Err(AppError::unauthorized("Account is disabled"));
    }

    Ok(AuthResponse {
        tokens: AuthTokens {
            access_token: issue_tokens(state, &user)?,
            refresh_token,
            expires_in: state.config.jwt.expiration_seconds,
            token_type: "Bearer".to_string(),
        },
        user:   UserResponse::from(user),
    })
}

/// Revokes every refresh token the caller holds.
pub async fn logout(state: &AppState, caller: &AuthenticatedUser) -> Result<()> {
    revoke_all_user_tokens(&state.db, caller.id).await?;
    log_auth_event!("logout", caller.id, true);
    Ok(())
}

/// Returns the caller's profile.
pub async fn me(state: &AppState, caller: &AuthenticatedUser) -> Result<UserResponse> {
    let user = users::Entity::find_by_id(caller.id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Account not found"))?;
    Ok(UserResponse::from(user))
}

/// Applies a partial profile update.
///
/// A username change recomputes the slug; an email change resets the
/// verified flag, forcing the address through verification again.
pub async fn update_me(state: &AppState, caller: &AuthenticatedUser, req: UpdateProfileRequest) -> Result<UserResponse> {
    req.validate()?;

    let user = users::Entity::find_by_id(caller.id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Account not found"))?;

    let mut active = user.clone().into_active_model();
    let mut changed = false;

    if let Some(username) = req.username {
        if username != user.username {
            if let Some(existing) = find_by_username_ci(&state.db, &username).await? {
                if existing.id != user.id {
                    return Err(AppError::validation("username: already taken"));
                }
            }
            active.slug = Set(slugify(&username));
            active.username = Set(username);
            changed = true;
        }
    }

    if let Some(email) = req.email {
        let email = email.to_lowercase();
        if email != user.email {
            if let Some(existing) = find_by_email(&state.db, &email).await? {
                if existing.id != user.id {
                    return Err(AppError::validation("email: already registered"));
                }
            }
            active.email = Set(email);
            active.is_verified = Set(false);
            changed = true;
        }
    }

    if let Some(first_name) = req.first_name {
        active.first_name = Set(Some(first_name));
        changed = true;
    }
    if let Some(last_name) = req.last_name {
        active.last_name = Set(Some(last_name));
        changed = true;
    }
    if let Some(image_url) = req.image_url {
        active.image_url = Set(Some(image_url));
        changed = true;
    }

    if !changed {
        return Ok(UserResponse::from(user));
    }

    active.updated_at = Set(Utc::now());
    let updated = active.update(&state.db).await?;

    Ok(UserResponse::from(updated))
}

/// Changes the caller's password after verifying the current one. All
/// refresh tokens are revoked so other sessions must log in again.
pub async fn change_password(state: &AppState, caller: &AuthenticatedUser, req: ChangePasswordRequest) -> Result<()> {
    req.validate()?;

    let user = users::Entity::find_by_id(caller.id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Account not found"))?;

    let old_secret = SecretString::from(req.old_password.clone());
    verify_password(&old_secret, &user.password_hash)
        .map_err(|_| AppError::unauthorized("Current password is incorrect"))?;

    if req.new_password == req.old_password {
        return Err(AppError::validation("password: new password must differ from the current one"));
    }

    validate_password_strength(&req.new_password, Some(&user.username)).map_err(strength_errors_to_validation)?;

    let new_secret = SecretString::from(req.new_password);
    let password_hash = hash_password(&new_secret, None)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;

    let user_id = user.id;
    let mut active = user.into_active_model();
    active.password_hash = Set(auth::secrecy::ExposeSecret::expose_secret(&password_hash).to_string());
    active.updated_at = Set(Utc::now());
    active.update(&state.db).await?;

    revoke_all_user_tokens(&state.db, user_id).await?;
    log_auth_event!("password_changed", user_id, true);

    Ok(())
}
