//! JSON endpoint handlers.

use std::net::SocketAddr;
use std::sync::LazyLock;

use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use regex::Regex;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::error::ApiError;
use super::AppState;
use crate::blueprints;
use crate::rate_limit::today_utc;

/// Simple email-shape check: local-part@domain.tld, no whitespace.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

/// Derive the caller's IP: first forwarded-for entry, else the socket's
/// remote address, else "unknown".
fn client_ip(headers: &HeaderMap, remote: Option<&SocketAddr>) -> String {
    if let Some(forwarded) = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    remote
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    level: Option<String>,
    stack: Option<String>,
    goal: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    email: Option<String>,
}

/// POST /api/generate — one blueprint per IP per day.
pub async fn generate(
    State(state): State<AppState>,
    headers: HeaderMap,
    remote: Option<ConnectInfo<SocketAddr>>,
    Json(req): Json<GenerateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (level, stack, goal) = match (
        req.level.as_deref().map(str::trim),
        req.stack.as_deref().map(str::trim),
        req.goal.as_deref().map(str::trim),
    ) {
        (Some(level), Some(stack), Some(goal))
            if !level.is_empty() && !stack.is_empty() && !goal.is_empty() =>
        {
            (level, stack, goal)
        }
        _ => return Err(ApiError::MissingFields),
    };

    let ip = client_ip(&headers, remote.as_ref().map(|c| &c.0));
    let today = today_utc();

    let allowed = state
        .rate_limiter
        .can_generate(&ip, &today)
        .await
        .map_err(|e| ApiError::store("Failed to generate blueprint", e))?;
    if !allowed {
        return Err(ApiError::DailyLimit);
    }

    let blueprint = blueprints::lookup(level, stack, goal);

    // The unique index on (ip_address, day) decides concurrent ties: the
    // losing insert maps to the same 429 as a failed pre-check.
    state
        .generations
        .record(&ip, level, stack, goal, blueprint.title, &today)
        .await
        .map_err(|e| {
            if e.is_unique_violation() {
                ApiError::DailyLimit
            } else {
                ApiError::store("Failed to generate blueprint", e)
            }
        })?;

    Ok(Json(json!({ "success": true, "blueprint": blueprint })))
}

/// POST /api/email — early-access signup.
pub async fn email_signup(
    State(state): State<AppState>,
    Json(req): Json<EmailRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = match req.email.as_deref().map(str::trim) {
        Some(email) if EMAIL_RE.is_match(email) => email.to_string(),
        _ => return Err(ApiError::InvalidEmail),
    };

    state.signups.insert(&email).await.map_err(|e| {
        if e.is_unique_violation() {
            ApiError::DuplicateEmail
        } else {
            ApiError::store("Failed to save email", e)
        }
    })?;

    // Fire-and-forget: the signup is already persisted and the response
    // does not wait on (or reflect) mail delivery.
    let mailer = state.mailer.clone();
    tokio::spawn(async move {
        if let Err(err) = mailer.send_confirmation(&email).await {
            warn!("Confirmation email to {} failed: {}", email, err);
        }
    });

    Ok(Json(json!({
        "success": true,
        "message": "Email saved! Check your inbox for confirmation."
    })))
}

/// GET /api/email-count — total signups.
pub async fn email_count(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let count = state
        .signups
        .count()
        .await
        .map_err(|e| ApiError::store("Failed to get count", e))?;

    Ok(Json(json!({ "count": count })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_regex_accepts_plain_addresses() {
        for ok in ["alice@example.com", "a.b+c@sub.domain.org", "x@y.co"] {
            assert!(EMAIL_RE.is_match(ok), "{ok} should match");
        }
    }

    #[test]
    fn email_regex_rejects_malformed_addresses() {
        for bad in [
            "not-an-email",
            "no at.example.com",
            "two@@example.com",
            "trailing@domain",
            "spaces in@example.com",
            "",
        ] {
            assert!(!EMAIL_RE.is_match(bad), "{bad} should not match");
        }
    }

    #[test]
    fn client_ip_prefers_forwarded_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "9.9.9.9, 10.0.0.1".parse().unwrap());
        let socket: SocketAddr = "127.0.0.1:9999".parse().unwrap();

        assert_eq!(client_ip(&headers, Some(&socket)), "9.9.9.9");
    }

    #[test]
    fn client_ip_falls_back_to_socket_then_unknown() {
        let headers = HeaderMap::new();
        let socket: SocketAddr = "192.168.1.5:4444".parse().unwrap();

        assert_eq!(client_ip(&headers, Some(&socket)), "192.168.1.5");
        assert_eq!(client_ip(&headers, None), "unknown");
    }
}
