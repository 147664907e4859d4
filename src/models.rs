//! Domain models, separate from the Diesel row types in `repository`.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// An early-access email signup.
#[derive(Debug, Clone, Serialize)]
pub struct Signup {
    pub id: i32,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// One blueprint generation by a client.
#[derive(Debug, Clone, Serialize)]
pub struct Generation {
    pub id: i32,
    pub ip_address: String,
    pub level: String,
    pub stack: String,
    pub goal: String,
    pub blueprint_title: String,
    /// UTC calendar day, `YYYY-MM-DD`. Paired with `ip_address` in a
    /// unique index to cap generations at one per IP per day.
    pub day: String,
    pub created_at: DateTime<Utc>,
}

/// A static project plan served by the generator.
///
/// Catalog entries are process-wide constants; the API serializes them
/// straight into the `/api/generate` response.
#[derive(Debug, Clone, Serialize)]
pub struct Blueprint {
    pub title: &'static str,
    pub description: &'static str,
    /// Suggested technologies, in build order.
    pub tech: &'static [&'static str],
    /// Week-by-week milestones.
    pub milestones: &'static [&'static str],
    pub estimated_weeks: u8,
}
