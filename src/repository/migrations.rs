//! Database migrations using diesel_migrations.
//!
//! Embeds migrations at compile time and runs them via a blocking task to
//! work with async connections. Safe to run on an already-initialized
//! file: applied migrations are skipped.

use diesel::Connection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::info;

use super::diesel_pool::DieselError;

pub const SQLITE_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/sqlite");

/// Run pending migrations for a database URL, creating the file if absent.
pub async fn run_migrations(database_url: &str) -> Result<(), DieselError> {
    // Strip sqlite: prefix if present - diesel expects just the file path
    let url = database_url
        .strip_prefix("sqlite:")
        .unwrap_or(database_url)
        .to_string();

    tokio::task::spawn_blocking(move || {
        let mut conn = diesel::SqliteConnection::establish(&url).map_err(|e| {
            DieselError::DatabaseError(
                diesel::result::DatabaseErrorKind::Unknown,
                Box::new(e.to_string()),
            )
        })?;

        let migrations = conn
            .run_pending_migrations(SQLITE_MIGRATIONS)
            .map_err(DieselError::QueryBuilderError)?;

        for migration in &migrations {
            info!("Applied migration: {}", migration);
        }

        if migrations.is_empty() {
            info!("No pending migrations");
        }

        Ok(())
    })
    .await
    .map_err(|e| DieselError::QueryBuilderError(Box::new(e)))?
}
