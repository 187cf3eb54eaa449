//! Account lifecycle coverage: registration, login, token rotation,
//! profile updates, and the password reset flow.

mod common;

use common::{test_app, UserFixture};
use error::AppError;
use server::{
    accounts::{handlers, password_reset},
    dto::accounts::{
        ChangePasswordRequest,
        LoginRequest,
        PasswordResetConfirmRequest,
        PasswordResetRequest,
        RefreshRequest,
        RegistrationRequest,
        UpdateProfileRequest,
    },
    refresh_tokens::validate_refresh_token,
};

fn registration(username: &str, email: &str) -> RegistrationRequest {
    RegistrationRequest {
        username:   username.to_string(),
        email:      email.to_string(),
        password:   "correct-horse-battery".to_string(),
        first_name: None,
        last_name:  None,
    }
}

#[tokio::test]
async fn test_registration_derives_slug_and_lowercases_email() {
    let app = test_app().await;

    let response = handlers::register(&app.state, registration("Chef Remy", "Remy@Example.COM"))
        .await
        .unwrap();

    assert_eq!(response.user.email, "remy@example.com");
    assert_eq!(response.user.slug, "chef-remy");
    assert!(!response.user.is_verified);
    assert!(!response.user.is_staff);
    assert_eq!(response.tokens.token_type, "Bearer");
}

#[tokio::test]
async fn test_registration_uniqueness_is_case_insensitive() {
    let app = test_app().await;
    UserFixture::new()
        .with_username("testuser")
        .with_email("test@example.com")
        .create(&app)
        .await;

    let err = handlers::register(&app.state, registration("other", "TEST@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));

    let err = handlers::register(&app.state, registration("TestUser", "fresh@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));
}

#[tokio::test]
async fn test_registration_rejects_weak_passwords() {
    let app = test_app().await;

    // All-numeric passes the length gate but fails strength checks.
    let mut req = registration("testuser", "test@example.com");
    req.password = "12345678".to_string();
    let err = handlers::register(&app.state, req).await.unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));

    // Containing the username is rejected too.
    let mut req = registration("testuser", "test@example.com");
    req.password = "xx-testuser-xx".to_string();
    let err = handlers::register(&app.state, req).await.unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));
}

#[tokio::test]
async fn test_login_accepts_username_or_email() {
    let app = test_app().await;
    let (user, _) = UserFixture::new().create(&app).await;

    let by_email = handlers::login(
        &app.state,
        LoginRequest {
            identifier: user.email.clone(),
            password:   "correct-horse-battery".to_string(),
        },
    )
    .await
    .unwrap();
    assert_eq!(by_email.user.id, user.id);

    let by_username = handlers::login(
        &app.state,
        LoginRequest {
            identifier: "TESTUSER".to_string(),
            password:   "correct-horse-battery".to_string(),
        },
    )
    .await
    .unwrap();
    assert_eq!(by_username.user.id, user.id);

    let err = handlers::login(
        &app.state,
        LoginRequest {
            identifier: user.email,
            password:   "wrong-password-entirely".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized { .. }));
}

#[tokio::test]
async fn test_refresh_rotates_the_token() {
    let app = test_app().await;
    let response = handlers::register(&app.state, registration("testuser", "test@example.com"))
        .await
        .unwrap();
    let original = response.tokens.refresh_token;

    let rotated = handlers::refresh(
        &app.state,
        RefreshRequest {
            refresh_token: original.clone(),
        },
    )
    .await
    .unwrap();
    assert_ne!(rotated.tokens.refresh_token, original);

    // The spent token is dead; the replacement works.
    assert!(validate_refresh_token(&app.state.db, &original).await.is_err());
    assert!(validate_refresh_token(&app.state.db, &rotated.tokens.refresh_token)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_logout_revokes_all_refresh_tokens() {
    let app = test_app().await;
    let response = handlers::register(&app.state, registration("testuser", "test@example.com"))
        .await
        .unwrap();
    let identity = server::middleware::auth::AuthenticatedUser {
        id:       response.user.id,
        email:    response.user.email.clone(),
        is_staff: false,
    };

    handlers::logout(&app.state, &identity).await.unwrap();
    assert!(validate_refresh_token(&app.state.db, &response.tokens.refresh_token)
        .await
        .is_err());
}

#[tokio::test]
async fn test_update_me_recomputes_slug_and_resets_verification() {
    let app = test_app().await;
    let (user, identity) = UserFixture::new().verified().create(&app).await;

    // Renaming recomputes the slug.
    let updated = handlers::update_me(
        &app.state,
        &identity,
        UpdateProfileRequest {
            username: Some("New Name".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.slug, "new-name");
    assert!(updated.is_verified, "renaming must not touch verification");

    // Changing the email drops verified status.
    let updated = handlers::update_me(
        &app.state,
        &identity,
        UpdateProfileRequest {
            email: Some("new@example.com".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.email, "new@example.com");
    assert!(!updated.is_verified);

    let _ = user;
}

#[tokio::test]
async fn test_change_password_requires_current_and_revokes_sessions() {
    let app = test_app().await;
    let response = handlers::register(&app.state, registration("testuser", "test@example.com"))
        .await
        .unwrap();
    let identity = server::middleware::auth::AuthenticatedUser {
        id:       response.user.id,
        email:    response.user.email.clone(),
        is_staff: false,
    };

    let err = handlers::change_password(
        &app.state,
        &identity,
        ChangePasswordRequest {
            old_password: "not-the-password".to_string(),
            new_password: "brand-new-password".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized { .. }));

    handlers::change_password(
        &app.state,
        &identity,
        ChangePasswordRequest {
            old_password: "correct-horse-battery".to_string(),
            new_password: "brand-new-password".to_string(),
        },
    )
    .await
    .unwrap();

    assert!(validate_refresh_token(&app.state.db, &response.tokens.refresh_token)
        .await
        .is_err());

    handlers::login(
        &app.state,
        LoginRequest {
            identifier: "testuser".to_string(),
            password:   "brand-new-password".to_string(),
        },
    )
    .await
    .expect("new password must work");
}

#[tokio::test]
async fn test_password_reset_never_reveals_accounts() {
    let app = test_app().await;
    UserFixture::new().create(&app).await;

    // Unknown address: same success, no mail.
    password_reset::request_reset(
        &app.state,
        PasswordResetRequest {
            email: "nobody@example.com".to_string(),
        },
    )
    .await
    .unwrap();
    assert!(!app.wait_for_mail(1).await, "no mail expected for unknown address");

    // Known address: success plus exactly one mail.
    password_reset::request_reset(
        &app.state,
        PasswordResetRequest {
            email: "test@example.com".to_string(),
        },
    )
    .await
    .unwrap();
    assert!(app.wait_for_mail(1).await);
    assert_eq!(app.sender.sent().len(), 1);
}

#[tokio::test]
async fn test_password_reset_token_is_single_use() {
    let app = test_app().await;
    UserFixture::new().create(&app).await;

    password_reset::request_reset(
        &app.state,
        PasswordResetRequest {
            email: "test@example.com".to_string(),
        },
    )
    .await
    .unwrap();
    assert!(app.wait_for_mail(1).await);

    let body = &app.sender.sent()[0].body;
    let token = body
        .split("token=")
        .nth(1)
        .and_then(|rest| rest.split_whitespace().next())
        .expect("reset link must carry a token")
        .to_string();

    password_reset::confirm_reset(
        &app.state,
        PasswordResetConfirmRequest {
            token:        token.clone(),
            new_password: "reset-to-something".to_string(),
        },
    )
    .await
    .unwrap();

    handlers::login(
        &app.state,
        LoginRequest {
            identifier: "testuser".to_string(),
            password:   "reset-to-something".to_string(),
        },
    )
    .await
    .expect("reset password must work");

    // Replaying the token fails.
    let err = password_reset::confirm_reset(
        &app.state,
        PasswordResetConfirmRequest {
            token,
            new_password: "yet-another-password".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest { .. }));
}
