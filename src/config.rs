//! Environment-driven configuration.
//!
//! Everything is read from the process environment (with `.env` loaded by
//! `main`). Missing mail credentials are not an error: the mailer degrades
//! to a logged no-op so the signup path keeps working.

use std::path::PathBuf;

use crate::repository::diesel_pool::AsyncSqlitePool;
use crate::repository::{DieselGenerationRepository, DieselSignupRepository};

/// Default listening port when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 3001;

/// File name of the embedded database inside the data directory.
pub const DATABASE_FILE: &str = "prelaunch.db";

/// SMTP credentials for the confirmation mailer.
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    /// SMTP relay host.
    pub host: String,
    /// Login user, also the default From address.
    pub username: String,
    /// App password for the relay.
    pub password: String,
    /// From header, e.g. `GitBoost <noreply@gitboost.dev>`.
    pub from: String,
}

/// Runtime settings for the server and maintenance commands.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory holding the database file.
    pub data_dir: PathBuf,
    /// Listening port for `serve`.
    pub port: u16,
    /// Front-end asset directory served as a fallback, if it exists.
    pub public_dir: PathBuf,
    /// Mail credentials; `None` disables the mailer.
    pub smtp: Option<SmtpSettings>,
}

impl Settings {
    /// Load settings from the environment.
    ///
    /// `data_dir_override` comes from the global `--data-dir` CLI flag and
    /// wins over `PRELAUNCH_DATA_DIR`.
    pub fn load(data_dir_override: Option<PathBuf>) -> anyhow::Result<Self> {
        let data_dir = data_dir_override
            .or_else(|| std::env::var_os("PRELAUNCH_DATA_DIR").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."));

        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("PORT is not a valid port number: {raw}"))?,
            Err(_) => DEFAULT_PORT,
        };

        let public_dir = std::env::var_os("PUBLIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("public"));

        Ok(Self {
            data_dir,
            port,
            public_dir,
            smtp: smtp_from_env(),
        })
    }

    /// Path of the embedded database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }

    /// Connection factory for the database file.
    pub fn create_pool(&self) -> AsyncSqlitePool {
        AsyncSqlitePool::from_path(&self.database_path())
    }

    /// Signup repository over this settings' database.
    pub fn signups(&self) -> DieselSignupRepository {
        DieselSignupRepository::new(self.create_pool())
    }

    /// Generation repository over this settings' database.
    pub fn generations(&self) -> DieselGenerationRepository {
        DieselGenerationRepository::new(self.create_pool())
    }

    /// Build settings for an explicit database location (tests).
    #[cfg(test)]
    pub fn for_data_dir(dir: &std::path::Path) -> Self {
        Self {
            data_dir: dir.to_path_buf(),
            port: DEFAULT_PORT,
            public_dir: dir.join("public"),
            smtp: None,
        }
    }
}

/// Read SMTP credentials from `EMAIL_USER`/`EMAIL_PASS`.
///
/// Returns `None` unless both are present and non-empty.
fn smtp_from_env() -> Option<SmtpSettings> {
    let username = std::env::var("EMAIL_USER").ok().filter(|v| !v.is_empty())?;
    let password = std::env::var("EMAIL_PASS").ok().filter(|v| !v.is_empty())?;

    let host = std::env::var("SMTP_HOST")
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "smtp.gmail.com".to_string());

    let from = std::env::var("EMAIL_FROM")
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| format!("GitBoost <{username}>"));

    Some(SmtpSettings {
        host,
        username,
        password,
        from,
    })
}
