//! # Password Reset
//!
//! Token-based reset flow. The request endpoint always answers `202`
//! whether or not the address is registered, so it cannot be used to probe
//! for accounts. Tokens are single-use and expire after an hour; only their
//! BLAKE3 hash is stored.

use auth::{hash_password, secrecy::SecretString, validate_password_strength, verify_password};
use chrono::Utc;
use entity::{password_reset_tokens, users};
use error::{AppError, Result};
use logging::log_auth_event;
use sea_orm::{prelude::*, ActiveValue::NotSet, IntoActiveModel, QueryFilter, Set};
use validator::Validate;

use crate::{
    dto::accounts::{PasswordResetConfirmRequest, PasswordResetRequest},
    mailer::EmailJob,
    refresh_tokens::{generate_refresh_token, revoke_all_user_tokens},
    AppState,
};

/// How long a reset token stays redeemable.
fn reset_validity() -> chrono::Duration { chrono::Duration::hours(1) }

fn hash_reset_token(token: &str) -> String { blake3::hash(token.as_bytes()).to_hex().to_string() }

/// Starts a reset for the given email. Succeeds unconditionally; the token
/// is only issued and mailed when the account exists.
pub async fn request_reset(state: &AppState, req: PasswordResetRequest) -> Result<()> {
    req.validate()?;

    let email = req.email.to_lowercase();
    let user = users::Entity::find()
        .filter(users::Column::Email.eq(&email))
        .one(&state.db)
        .await?;

    let Some(user) = user else {
        // Same response either way; nothing to issue.
        return Ok(());
    };

    let token = generate_refresh_token();
    let now = Utc::now();

    password_reset_tokens::ActiveModel {
        id:          NotSet,
        user_id:     Set(user.id),
        token_hash:  Set(hash_reset_token(&token)),
        expires_at:  Set(now + reset_validity()),
        consumed_at: Set(None),
        created_at:  Set(now),
    }
    .insert(&state.db)
    .await?;

    state.mailer.enqueue(EmailJob::PasswordReset {
        user_id: user.id,
        token,
    });
    log_auth_event!("password_reset_requested", user.id, true);

    Ok(())
}

/// Completes a reset: consumes the token, stores the new password hash, and
/// revokes every refresh token the account holds.
///
/// # Errors
///
/// `BadRequest` for unknown, consumed, or expired tokens so callers cannot
/// distinguish the three.
pub async fn confirm_reset(state: &AppState, req: PasswordResetConfirmRequest) -> Result<()> {
    req.validate()?;

    let record = password_reset_tokens::Entity::find()
        .filter(password_reset_tokens::Column::TokenHash.eq(hash_reset_token(&req.token)))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::bad_request("Invalid or expired reset token"))?;

    if !record.is_redeemable(Utc::now()) {
        return Err(AppError::bad_request("Invalid or expired reset token"));
    }

    let user = users::Entity::find_by_id(record.user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::bad_request("Invalid or expired reset token"))?;

    validate_password_strength(&req.new_password, Some(&user.username)).map_err(|errors| {
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        AppError::validation(format!("password: {}", messages.join(", ")))
    })?;

    let new_secret = SecretString::from(req.new_password.clone());
    if verify_password(&new_secret, &user.password_hash).is_ok() {
        return Err(AppError::validation("password: new password must differ from the current one"));
    }

    let password_hash = hash_password(&new_secret, None)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;

    let user_id = user.id;
    let mut active_user = user.into_active_model();
    active_user.password_hash = Set(auth::secrecy::ExposeSecret::expose_secret(&password_hash).to_string());
    active_user.updated_at = Set(Utc::now());
    active_user.update(&state.db).await?;

    let mut active_token = record.into_active_model();
    active_token.consumed_at = Set(Some(Utc::now()));
    active_token.update(&state.db).await?;

    revoke_all_user_tokens(&state.db, user_id).await?;
    log_auth_event!("password_reset_confirmed", user_id, true);

    Ok(())
}
