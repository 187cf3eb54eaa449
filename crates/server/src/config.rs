//! # Server Configuration
//!
//! Explicitly constructed configuration passed into the application at
//! startup. Nothing in the handler layer reads the environment; the cli
//! crate builds an [`AppConfig`] once and hands it down.

use error::{AppError, Result};

/// JWT signing configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Base64-encoded signing secret
    pub secret:                     String,
    /// Access token lifetime in seconds
    pub expiration_seconds:         u64,
    /// Refresh token lifetime in seconds
    pub refresh_expiration_seconds: u64,
    /// Token issuer claim
    pub issuer:                     String,
    /// Token audience claim
    pub audience:                   String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret:                     String::new(),
            expiration_seconds:         900,
            refresh_expiration_seconds: 30 * 24 * 60 * 60,
            issuer:                     "ladle".to_string(),
            audience:                   "ladle-api".to_string(),
        }
    }
}

/// Email verification policy knobs.
///
/// `min_interval` throttles reissuance; `validity_window` bounds how long an
/// issued code can be redeemed.
#[derive(Debug, Clone, Copy)]
pub struct VerificationConfig {
    pub min_interval:    chrono::Duration,
    pub validity_window: chrono::Duration,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            min_interval:    chrono::Duration::seconds(60),
            validity_window: chrono::Duration::hours(48),
        }
    }
}

/// Outbound mail settings. The base URL is what confirmation links are
/// rendered against, not where the server listens.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub from_address:    String,
    pub public_base_url: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            from_address:    "no-reply@ladle.dev".to_string(),
            public_base_url: "http://localhost:8080".to_string(),
        }
    }
}

/// Cache TTLs in seconds for the read-through caches.
#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    pub categories_ttl: u64,
    pub recipes_ttl:    u64,
    pub popular_ttl:    u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            categories_ttl: 60 * 60,
            recipes_ttl:    60 * 60,
            popular_ttl:    24 * 60 * 60,
        }
    }
}

/// Pagination defaults applied when the query string omits them.
#[derive(Debug, Clone, Copy)]
pub struct PaginationConfig {
    pub default_per_page: u64,
    pub max_per_page:     u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_per_page: 20,
            max_per_page:     100,
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub jwt:          JwtConfig,
    pub verification: VerificationConfig,
    pub mail:         MailConfig,
    pub cache:        CacheConfig,
    pub pagination:   PaginationConfig,
}

impl AppConfig {
    /// Builds the configuration from `LADLE_*` environment variables,
    /// falling back to defaults for anything unset.
    ///
    /// # Errors
    ///
    /// Returns an error if `LADLE_JWT_SECRET` is missing or a numeric
    /// variable fails to parse.
    pub fn from_env() -> Result<Self> {
        let secret = std::env::var("LADLE_JWT_SECRET")
            .map_err(|_| AppError::config("LADLE_JWT_SECRET is not set"))?;

        let mut config = Self::default();
        config.jwt.secret = secret;
        config.jwt.expiration_seconds = parse_var("LADLE_JWT_EXPIRATION_SECS", config.jwt.expiration_seconds)?;
        config.jwt.refresh_expiration_seconds = parse_var(
            "LADLE_JWT_REFRESH_EXPIRATION_SECS",
            config.jwt.refresh_expiration_seconds,
        )?;
        if let Ok(issuer) = std::env::var("LADLE_JWT_ISSUER") {
            config.jwt.issuer = issuer;
        }
        if let Ok(audience) = std::env::var("LADLE_JWT_AUDIENCE") {
            config.jwt.audience = audience;
        }

        let min_interval = parse_var(
            "LADLE_VERIFICATION_MIN_INTERVAL_SECS",
            config.verification.min_interval.num_seconds(),
        )?;
        let validity_hours = parse_var(
            "LADLE_VERIFICATION_VALIDITY_HOURS",
            config.verification.validity_window.num_hours(),
        )?;
        config.verification.min_interval = chrono::Duration::seconds(min_interval);
        config.verification.validity_window = chrono::Duration::hours(validity_hours);

        if let Ok(from) = std::env::var("LADLE_MAIL_FROM") {
            config.mail.from_address = from;
        }
        if let Ok(base) = std::env::var("LADLE_PUBLIC_BASE_URL") {
            config.mail.public_base_url = base;
        }

        config.cache.categories_ttl = parse_var("LADLE_CACHE_CATEGORIES_TTL_SECS", config.cache.categories_ttl)?;
        config.cache.recipes_ttl = parse_var("LADLE_CACHE_RECIPES_TTL_SECS", config.cache.recipes_ttl)?;
        config.cache.popular_ttl = parse_var("LADLE_CACHE_POPULAR_TTL_SECS", config.cache.popular_ttl)?;

        config.pagination.default_per_page =
            parse_var("LADLE_PAGINATION_DEFAULT_PER_PAGE", config.pagination.default_per_page)?;
        config.pagination.max_per_page = parse_var("LADLE_PAGINATION_MAX_PER_PAGE", config.pagination.max_per_page)?;

        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match std::env::var(name) {
        Ok(raw) => {
            raw.parse()
                .map_err(|_| AppError::config(format!("{name} is not a valid number: {raw}")))
        },
        Err(_) => Ok(default),
    }
}
