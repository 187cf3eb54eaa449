//! Standalone migration runner.
//!
//! Builds `DATABASE_URL` from the `LADLE_DATABASE_*` environment and hands
//! control to the `sea-orm-migration` CLI (up / down / status / fresh).

use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    if std::env::var("DATABASE_URL").is_err() {
        let config = migration::db::load_config_from_env();
        // SAFETY: single-threaded at this point, before the runtime spawns workers
        unsafe {
            std::env::set_var("DATABASE_URL", config.connection_string());
        }
    }
    cli::run_cli(migration::Migrator).await;
}
