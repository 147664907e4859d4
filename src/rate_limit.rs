//! One-generation-per-IP-per-day policy.
//!
//! `can_generate` is a fast-path pre-check; the real arbiter is the
//! `(ip_address, day)` unique index, so a concurrent pair of requests from
//! one IP still yields exactly one row. Handlers map the losing insert's
//! unique violation to the same 429 as a failed pre-check.

use chrono::Utc;

use crate::repository::{DieselGenerationRepository, RepositoryError};

/// Today's UTC calendar day as `YYYY-MM-DD`.
pub fn today_utc() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

/// Daily quota check over the generation log.
#[derive(Clone)]
pub struct RateLimiter {
    generations: DieselGenerationRepository,
}

impl RateLimiter {
    pub fn new(generations: DieselGenerationRepository) -> Self {
        Self { generations }
    }

    /// True iff `ip` has no generation row dated `day`.
    pub async fn can_generate(&self, ip: &str, day: &str) -> Result<bool, RepositoryError> {
        Ok(!self.generations.generated_on(ip, day).await?)
    }
}
