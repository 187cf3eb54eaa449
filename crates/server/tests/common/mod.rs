//! # Common Test Utilities
//!
//! Shared test infrastructure: an in-memory SQLite database with the full
//! schema applied, application state wired to a recording mail sender, and
//! user fixtures.

use std::sync::{Arc, Once};

use base64::Engine;
use chrono::Utc;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, Database, EntityTrait, IntoActiveModel, Set};
use server::{
    config::AppConfig,
    dto::accounts::RegistrationRequest,
    mailer::RecordingSender,
    middleware::auth::AuthenticatedUser,
    AppState,
};

/// Initialize test logging (run once per test session)
static INIT: Once = Once::new();

/// Initialize test environment including structured logging
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// Fully wired application state backed by in-memory SQLite. The Redis
/// client points at a closed port, so every cache path exercises its
/// fail-open branch.
pub struct TestApp {
    pub state:  AppState,
    pub sender: Arc<RecordingSender>,
}

pub async fn test_app() -> TestApp {
    init_test_env();

    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");
    Migrator::up(&db, None).await.expect("Failed to run migrations");

    let redis = redis::Client::open("redis://127.0.0.1:1/").expect("Failed to create Redis client");

    let mut config = AppConfig::default();
    config.jwt.secret =
        base64::engine::general_purpose::STANDARD.encode("test-secret-key-that-is-at-least-32-bytes-long");

    let sender = Arc::new(RecordingSender::new());
    let state = AppState::with_sender(db, redis, config, sender.clone());

    TestApp { state, sender }
}

impl TestApp {
    /// Polls until the mail worker has delivered `count` messages, up to a
    /// second.
    pub async fn wait_for_mail(&self, count: usize) -> bool {
        for _ in 0 .. 100 {
            if self.sender.sent().len() >= count {
                return true;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        false
    }
}

/// Test fixture for user accounts, registered through the real handler so
/// passwords are properly hashed and slugs derived.
pub struct UserFixture {
    pub username: String,
    pub email:    String,
    pub password: String,
    pub staff:    bool,
    pub verified: bool,
}

impl Default for UserFixture {
    fn default() -> Self {
        Self {
            username: "testuser".to_string(),
            email:    "test@example.com".to_string(),
            password: "correct-horse-battery".to_string(),
            staff:    false,
            verified: false,
        }
    }
}

impl UserFixture {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    #[must_use]
    pub fn staff(mut self) -> Self {
        self.staff = true;
        self
    }

    #[must_use]
    pub fn verified(mut self) -> Self {
        self.verified = true;
        self
    }

    /// Registers the account and returns the stored model alongside the
    /// identity the middleware would attach.
    pub async fn create(self, app: &TestApp) -> (entity::users::Model, AuthenticatedUser) {
        let response = server::accounts::handlers::register(
            &app.state,
            RegistrationRequest {
                username:   self.username,
                email:      self.email,
                password:   self.password,
                first_name: None,
                last_name:  None,
            },
        )
        .await
        .expect("Failed to register fixture user");

        let mut user = entity::users::Entity::find_by_id(response.user.id)
            .one(&app.state.db)
            .await
            .expect("Failed to load fixture user")
            .expect("Fixture user missing");

        if self.staff || self.verified {
            let mut active = user.clone().into_active_model();
            if self.staff {
                active.is_staff = Set(true);
            }
            if self.verified {
                active.is_verified = Set(true);
            }
            active.updated_at = Set(Utc::now());
            user = active.update(&app.state.db).await.expect("Failed to update fixture user");
        }

        let identity = AuthenticatedUser {
            id:       user.id,
            email:    user.email.clone(),
            is_staff: user.is_staff,
        };
        (user, identity)
    }
}
