//! End-to-end coverage for the email verification policy: issuance
//! ordering, rate limiting, redemption, expiry, and ownership isolation.

mod common;

use chrono::{Duration, Utc};
use common::{test_app, UserFixture};
use error::AppError;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, Set};
use server::accounts::verification::{redeem, request_verification};
use uuid::Uuid;

#[tokio::test]
async fn test_issue_then_redeem_verifies_account() {
    let app = test_app().await;
    let (user, identity) = UserFixture::new().create(&app).await;
    assert!(!user.is_verified);

    let record = request_verification(
        &app.state.db,
        &app.state.mailer,
        &app.state.config.verification,
        &identity,
        &user.email,
    )
    .await
    .expect("issuance failed");
    assert_eq!(record.user_id, user.id);
    assert!(record.expiration > Utc::now() + Duration::hours(47));

    redeem(&app.state.db, &identity, &user.email, record.code)
        .await
        .expect("redemption failed");

    let reloaded = entity::users::Entity::find_by_id(user.id)
        .one(&app.state.db)
        .await
        .unwrap()
        .unwrap();
    assert!(reloaded.is_verified);

    // The issuance record itself is never mutated.
    let stored = entity::email_verifications::Entity::find_by_id(record.id)
        .one(&app.state.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.code, record.code);
}

#[tokio::test]
async fn test_issuance_enqueues_exactly_one_email() {
    let app = test_app().await;
    let (user, identity) = UserFixture::new().create(&app).await;

    request_verification(
        &app.state.db,
        &app.state.mailer,
        &app.state.config.verification,
        &identity,
        &user.email,
    )
    .await
    .unwrap();

    assert!(app.wait_for_mail(1).await, "verification email never delivered");
    let sent = app.sender.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, user.email);
    assert!(sent[0].body.contains("/api/v1/accounts/verify/"));
}

#[tokio::test]
async fn test_reissue_inside_window_is_rate_limited() {
    let app = test_app().await;
    let (user, identity) = UserFixture::new().create(&app).await;

    request_verification(
        &app.state.db,
        &app.state.mailer,
        &app.state.config.verification,
        &identity,
        &user.email,
    )
    .await
    .unwrap();

    let err = request_verification(
        &app.state.db,
        &app.state.mailer,
        &app.state.config.verification,
        &identity,
        &user.email,
    )
    .await
    .unwrap_err();

    match err {
        AppError::RateLimited { seconds_left } => {
            assert!(seconds_left <= 60);
            assert!(seconds_left >= 55, "window should have barely elapsed");
        },
        other => panic!("expected RateLimited, got {other:?}"),
    }

    // No second record was written.
    let count = entity::email_verifications::Entity::find()
        .filter(entity::email_verifications::Column::UserId.eq(user.id))
        .count(&app.state.db)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_expired_records_do_not_gate_reissuance() {
    let app = test_app().await;
    let (user, identity) = UserFixture::new().create(&app).await;

    let record = request_verification(
        &app.state.db,
        &app.state.mailer,
        &app.state.config.verification,
        &identity,
        &user.email,
    )
    .await
    .unwrap();

    // Age the record past its validity window.
    let mut active = record.into_active_model();
    active.created_at = Set(Utc::now() - Duration::hours(49));
    active.expiration = Set(Utc::now() - Duration::hours(1));
    active.update(&app.state.db).await.unwrap();

    request_verification(
        &app.state.db,
        &app.state.mailer,
        &app.state.config.verification,
        &identity,
        &user.email,
    )
    .await
    .expect("expired record must not rate-limit reissuance");
}

#[tokio::test]
async fn test_verified_account_is_terminal() {
    let app = test_app().await;
    let (user, identity) = UserFixture::new().verified().create(&app).await;

    let err = request_verification(
        &app.state.db,
        &app.state.mailer,
        &app.state.config.verification,
        &identity,
        &user.email,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::AlreadyVerified { .. }));

    // Redemption of any code is equally terminal.
    let err = redeem(&app.state.db, &identity, &user.email, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AlreadyVerified { .. }));
}

#[tokio::test]
async fn test_redeeming_expired_code_is_gone() {
    let app = test_app().await;
    let (user, identity) = UserFixture::new().create(&app).await;

    let record = request_verification(
        &app.state.db,
        &app.state.mailer,
        &app.state.config.verification,
        &identity,
        &user.email,
    )
    .await
    .unwrap();

    let code = record.code;
    let mut active = record.into_active_model();
    active.expiration = Set(Utc::now() - Duration::seconds(1));
    active.update(&app.state.db).await.unwrap();

    let err = redeem(&app.state.db, &identity, &user.email, code).await.unwrap_err();
    assert!(matches!(err, AppError::Gone { .. }));

    let reloaded = entity::users::Entity::find_by_id(user.id)
        .one(&app.state.db)
        .await
        .unwrap()
        .unwrap();
    assert!(!reloaded.is_verified, "expired redemption must not verify");
}

#[tokio::test]
async fn test_unknown_code_is_not_found() {
    let app = test_app().await;
    let (user, identity) = UserFixture::new().create(&app).await;

    let err = redeem(&app.state.db, &identity, &user.email, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));
}

#[tokio::test]
async fn test_ownership_is_never_leaked() {
    let app = test_app().await;
    let (alice, alice_identity) = UserFixture::new()
        .with_username("alice")
        .with_email("alice@example.com")
        .create(&app)
        .await;
    let (_bob, bob_identity) = UserFixture::new()
        .with_username("bobby")
        .with_email("bob@example.com")
        .create(&app)
        .await;

    // Bob asking about Alice's address gets a plain 404, whether issuing
    // or redeeming, and no record is created.
    let err = request_verification(
        &app.state.db,
        &app.state.mailer,
        &app.state.config.verification,
        &bob_identity,
        &alice.email,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));

    let record = request_verification(
        &app.state.db,
        &app.state.mailer,
        &app.state.config.verification,
        &alice_identity,
        &alice.email,
    )
    .await
    .unwrap();

    let err = redeem(&app.state.db, &bob_identity, &alice.email, record.code)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));

    // Unknown address: same shape.
    let err = request_verification(
        &app.state.db,
        &app.state.mailer,
        &app.state.config.verification,
        &bob_identity,
        "nobody@example.com",
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));
}

#[tokio::test]
async fn test_target_email_is_case_insensitive() {
    let app = test_app().await;
    let (user, identity) = UserFixture::new().create(&app).await;

    let record = request_verification(
        &app.state.db,
        &app.state.mailer,
        &app.state.config.verification,
        &identity,
        &user.email.to_uppercase(),
    )
    .await
    .expect("uppercased target email must resolve");

    redeem(&app.state.db, &identity, &user.email.to_uppercase(), record.code)
        .await
        .expect("uppercased target email must redeem");
}
