//! # Ladle API Server
//!
//! Axum-based JSON API for the Ladle recipe catalog.
//!
//! ## Modules
//!
//! - [`accounts`]: Registration, login, email verification, password reset
//! - [`catalog`]: Categories, recipes, and ingredients
//! - [`interactions`]: Bookmarks and comments
//! - [`mailer`]: Fire-and-forget email dispatch
//! - [`cache`]: Read-through Redis cache helper
//! - [`router`]: API route configuration

pub mod accounts;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod dto;
pub mod interactions;
pub mod jwt;
pub mod mailer;
pub mod middleware;
pub mod refresh_tokens;
pub mod router;
pub mod utils;

pub use config::AppConfig;
pub use router::create_app_router;

/// Application state shared across request handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db:         sea_orm::DbConn,
    /// Redis client for caching and view deduplication
    pub redis:      redis::Client,
    /// Application configuration
    pub config:     AppConfig,
    /// Queue handle for outbound email jobs
    pub mailer:     mailer::Mailer,
    /// Server start time for uptime calculation
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Assembles the shared state and spawns the mail worker with the
    /// default tracing-backed sender.
    #[must_use]
    pub fn new(db: sea_orm::DbConn, redis: redis::Client, config: AppConfig) -> Self {
        Self::with_sender(db, redis, config, std::sync::Arc::new(mailer::TracingSender))
    }

    /// Like [`AppState::new`] but with an explicit mail transport. Tests
    /// pass a recording sender here.
    #[must_use]
    pub fn with_sender(
        db: sea_orm::DbConn,
        redis: redis::Client,
        config: AppConfig,
        sender: std::sync::Arc<dyn mailer::EmailSender>,
    ) -> Self {
        let mailer = mailer::Mailer::spawn(db.clone(), config.mail.clone(), sender);
        Self {
            db,
            redis,
            config,
            mailer,
            start_time: std::time::Instant::now(),
        }
    }
}
