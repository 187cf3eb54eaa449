//! # Email Verification Policy
//!
//! Issuance and redemption of email verification codes. Records are
//! append-only; redemption flips `users.is_verified` and touches nothing
//! else. Ownership failures are always reported as not-found so the
//! endpoints never leak whether an address is registered to someone else.

use chrono::Utc;
use entity::{email_verifications, users};
use error::{AppError, Result};
use logging::log_auth_event;
use sea_orm::{prelude::*, DbConn, IntoActiveModel, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    config::VerificationConfig,
    mailer::{EmailJob, Mailer},
    middleware::auth::AuthenticatedUser,
};

/// Loads the user owning `target_email`, enforcing that the requester is
/// that user. Any mismatch is a plain not-found.
async fn load_owned_user(db: &DbConn, requester: &AuthenticatedUser, target_email: &str) -> Result<users::Model> {
    let email = target_email.to_lowercase();
    let user = users::Entity::find()
        .filter(users::Column::Email.eq(&email))
        .one(db)
        .await?;

    match user {
        Some(user) if user.id == requester.id => Ok(user),
        _ => Err(AppError::not_found("Account not found")),
    }
}

/// Issues a new verification code for the requester's own account.
///
/// Decision order: ownership, terminal verified state, rate window, insert.
/// The rate window is measured from the newest unexpired record; expired
/// records never gate reissuance. The check-then-insert sequence is
/// deliberately unserialized; overlapping records are valid and redemption
/// tolerates them.
///
/// # Errors
///
/// `NotFound` on ownership failure, `AlreadyVerified` for verified
/// accounts, `RateLimited` inside the reissue window.
pub async fn request_verification(
    db: &DbConn,
    mailer: &Mailer,
    config: &VerificationConfig,
    requester: &AuthenticatedUser,
    target_email: &str,
) -> Result<email_verifications::Model> {
    let user = load_owned_user(db, requester, target_email).await?;

    if user.is_verified {
        return Err(AppError::already_verified("Account is already verified"));
    }

    let now = Utc::now();
    let newest_unexpired = email_verifications::Entity::find()
        .filter(email_verifications::Column::UserId.eq(user.id))
        .filter(email_verifications::Column::Expiration.gt(now))
        .order_by_desc(email_verifications::Column::CreatedAt)
        .one(db)
        .await?;

    if let Some(record) = newest_unexpired {
        let elapsed = now - record.created_at;
        if elapsed < config.min_interval {
            return Err(AppError::rate_limited((config.min_interval - elapsed).num_seconds()));
        }
    }

    let record = email_verifications::ActiveModel {
        id:         Set(Uuid::new_v4()),
        code:       Set(Uuid::new_v4()),
        user_id:    Set(user.id),
        created_at: Set(now),
        expiration: Set(now + config.validity_window),
    }
    .insert(db)
    .await?;

    mailer.enqueue(EmailJob::Verification { record_id: record.id });
    log_auth_event!("verification_issued", user.id, true);

    Ok(record)
}

/// Redeems a verification code for the requester's own account.
///
/// Decision order: ownership, terminal verified state, code match, expiry.
/// On success exactly one field changes: `users.is_verified`.
///
/// # Errors
///
/// `NotFound` on ownership failure or unknown code, `AlreadyVerified` for
/// verified accounts, `Gone` for expired codes.
pub async fn redeem(
    db: &DbConn,
    requester: &AuthenticatedUser,
    target_email: &str,
    presented_code: Uuid,
) -> Result<()> {
    let user = load_owned_user(db, requester, target_email).await?;

    if user.is_verified {
        return Err(AppError::already_verified("Account is already verified"));
    }

    let record = email_verifications::Entity::find()
        .filter(email_verifications::Column::UserId.eq(user.id))
        .filter(email_verifications::Column::Code.eq(presented_code))
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("Verification code not found"))?;

    if record.is_expired(Utc::now()) {
        return Err(AppError::gone("Verification code has expired"));
    }

    let user_id = user.id;
    let mut active = user.into_active_model();
    active.is_verified = Set(true);
    active.updated_at = Set(Utc::now());
    active.update(db).await?;

    log_auth_event!("verification_redeemed", user_id, true);

    Ok(())
}
