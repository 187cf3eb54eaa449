//! # Refresh Token Service
//!
//! Storage and rotation of DB-backed refresh tokens. Raw token values never
//! touch the database; only their BLAKE3 hashes are stored.

use base64::{engine::general_purpose, Engine as _};
use chrono::Utc;
use error::{AppError, Result};
use rand::RngCore;
use sea_orm::{prelude::*, ActiveValue::NotSet, DbConn, QueryFilter, Set};
use uuid::Uuid;

/// Generates a secure random refresh token value
///
/// 32 bytes of randomness, URL-safe base64 without padding.
#[must_use]
pub fn generate_refresh_token() -> String {
    let mut random_bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut random_bytes);
    general_purpose::URL_SAFE_NO_PAD.encode(random_bytes)
}

fn hash_token(token_value: &str) -> String { blake3::hash(token_value.as_bytes()).to_hex().to_string() }

/// Creates a new refresh token row for a user
///
/// # Errors
///
/// Returns an error if the insert fails.
pub async fn create_refresh_token(
    db: &DbConn,
    user_id: Uuid,
    token_value: &str,
    expires_in_seconds: u64,
) -> Result<entity::refresh_tokens::Model> {
    let expires_at = Utc::now() + chrono::Duration::seconds(expires_in_seconds as i64);

    let active_model = entity::refresh_tokens::ActiveModel {
        id: NotSet,
        user_id: Set(user_id),
        token_hash: Set(hash_token(token_value)),
        expires_at: Set(expires_at),
        revoked_at: Set(None),
        created_at: Set(Utc::now()),
    };

    let model = active_model
        .insert(db)
        .await
        .map_err(|e| AppError::from(e).context("Failed to create refresh token"))?;

    Ok(model)
}

/// Validates a refresh token and returns the owning user ID
///
/// # Errors
///
/// Returns `Unauthorized` if the token is unknown, revoked, or expired.
pub async fn validate_refresh_token(db: &DbConn, token_value: &str) -> Result<Uuid> {
    let token_model = entity::refresh_tokens::Entity::find()
        .filter(entity::refresh_tokens::Column::TokenHash.eq(hash_token(token_value)))
        .one(db)
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid refresh token"))?;

    if !token_model.is_valid(Utc::now()) {
        return Err(AppError::unauthorized("Refresh token is revoked or expired"));
    }

    Ok(token_model.user_id)
}

/// Revokes a single refresh token
///
/// # Errors
///
/// Returns `Unauthorized` if no matching active token exists.
pub async fn revoke_refresh_token(db: &DbConn, token_value: &str) -> Result<()> {
    let update_result = entity::refresh_tokens::Entity::update_many()
        .col_expr(
            entity::refresh_tokens::Column::RevokedAt,
            Expr::value(Some(Utc::now())),
        )
        .filter(entity::refresh_tokens::Column::TokenHash.eq(hash_token(token_value)))
        .filter(entity::refresh_tokens::Column::RevokedAt.is_null())
        .exec(db)
        .await?;

    if update_result.rows_affected == 0 {
        return Err(AppError::unauthorized("Refresh token not found"));
    }

    Ok(())
}

/// Revokes every active refresh token for a user
///
/// # Errors
///
/// Returns an error if the update fails.
pub async fn revoke_all_user_tokens(db: &DbConn, user_id: Uuid) -> Result<()> {
    entity::refresh_tokens::Entity::update_many()
        .col_expr(
            entity::refresh_tokens::Column::RevokedAt,
            Expr::value(Some(Utc::now())),
        )
        .filter(entity::refresh_tokens::Column::UserId.eq(user_id))
        .filter(entity::refresh_tokens::Column::RevokedAt.is_null())
        .exec(db)
        .await?;

    Ok(())
}

/// Rotates a refresh token: validates and revokes the presented value, then
/// issues a replacement for the same user.
///
/// # Errors
///
/// Returns `Unauthorized` if the presented token is not usable.
pub async fn rotate_refresh_token(db: &DbConn, token_value: &str, expires_in_seconds: u64) -> Result<(Uuid, String)> {
    let user_id = validate_refresh_token(db, token_value).await?;
    revoke_refresh_token(db, token_value).await?;

    let replacement = generate_refresh_token();
    create_refresh_token(db, user_id, &replacement, expires_in_seconds).await?;

    Ok((user_id, replacement))
}

/// Deletes expired refresh tokens, returning how many rows went away
///
/// # Errors
///
/// Returns an error if the delete fails.
pub async fn cleanup_expired_tokens(db: &DbConn) -> Result<u64> {
    let delete_result = entity::refresh_tokens::Entity::delete_many()
        .filter(entity::refresh_tokens::Column::ExpiresAt.lt(Utc::now()))
        .exec(db)
        .await?;

    Ok(delete_result.rows_affected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_refresh_token() {
        let token1 = generate_refresh_token();
        let token2 = generate_refresh_token();

        assert_ne!(token1, token2);
        assert!(token1.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_'));
        // 32 bytes base64 encoded without padding
        assert_eq!(token1.len(), 43);
    }

    #[test]
    fn test_token_hashing_is_stable() {
        let hash1 = hash_token("test-token-value");
        let hash2 = hash_token("test-token-value");

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
        assert_ne!(hash_token("other"), hash1);
    }
}
