//! # CLI Validate Command
//!
//! Configuration validation for the Ladle CLI.

use error::{AppError, Result};
use tracing::info;

/// Validates the configuration without touching the database.
///
/// Checks that the application config loads (which requires
/// `LADLE_JWT_SECRET`) and that the Redis URL parses.
pub fn validate() -> Result<()> {
    let config = server::AppConfig::from_env()?;

    let redis_url = crate::config::redis_url_from_env();
    redis::Client::open(redis_url.as_str())
        .map_err(|e| AppError::config(format!("Invalid Redis URL {redis_url}: {e}")))?;

    let db_config = migration::db::load_config_from_env();

    info!(
        target: "validate",
        database = %db_config.database,
        issuer = %config.jwt.issuer,
        "Configuration is valid"
    );
    Ok(())
}
