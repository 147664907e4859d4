//! HTTP server for the pre-launch API.
//!
//! Three JSON endpoints over the embedded store:
//! - `POST /api/generate` — rate-limited blueprint generation
//! - `POST /api/email` — early-access signup with confirmation email
//! - `GET /api/email-count` — signup counter for the landing page

mod error;
mod handlers;
mod routes;

pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::Settings;
use crate::mailer::Mailer;
use crate::rate_limit::RateLimiter;
use crate::repository::{DieselGenerationRepository, DieselSignupRepository};

/// Shared state for the API server.
#[derive(Clone)]
pub struct AppState {
    pub signups: Arc<DieselSignupRepository>,
    pub generations: Arc<DieselGenerationRepository>,
    pub rate_limiter: RateLimiter,
    pub mailer: Arc<Mailer>,
}

impl AppState {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let generations = settings.generations();

        Ok(Self {
            signups: Arc::new(settings.signups()),
            generations: Arc::new(generations.clone()),
            rate_limiter: RateLimiter::new(generations),
            mailer: Arc::new(Mailer::from_settings(settings.smtp.as_ref())?),
        })
    }
}

/// Start the API server.
pub async fn serve(settings: &Settings, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(settings)?;
    state.mailer.verify().await;

    let app = create_router(state, &settings.public_dir);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tempfile::tempdir;
    use tower::ServiceExt;

    use crate::repository::migrations::run_migrations;

    async fn setup_test_app() -> (axum::Router, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let settings = Settings::for_data_dir(dir.path());

        let pool = settings.create_pool();
        run_migrations(pool.database_url()).await.unwrap();

        let generations = settings.generations();
        let state = AppState {
            signups: Arc::new(settings.signups()),
            generations: Arc::new(generations.clone()),
            rate_limiter: RateLimiter::new(generations),
            mailer: Arc::new(Mailer::disabled()),
        };

        let app = create_router(state, &settings.public_dir);
        (app, dir)
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_json_from(uri: &str, ip: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .header("x-forwarded-for", ip)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn email_count(app: &axum::Router) -> i64 {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/email-count")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        body_json(response).await["count"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn email_count_starts_at_zero() {
        let (app, _dir) = setup_test_app().await;
        assert_eq!(email_count(&app).await, 0);
    }

    #[tokio::test]
    async fn signup_then_duplicate() {
        let (app, _dir) = setup_test_app().await;

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/email",
                serde_json::json!({"email": "alice@example.com"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert!(json["message"].as_str().unwrap().contains("inbox"));
        assert_eq!(email_count(&app).await, 1);

        // Identical address again: 400, count unchanged
        let response = app
            .clone()
            .oneshot(post_json(
                "/api/email",
                serde_json::json!({"email": "alice@example.com"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Email already registered");
        assert_eq!(email_count(&app).await, 1);
    }

    #[tokio::test]
    async fn malformed_email_rejected_without_side_effects() {
        let (app, _dir) = setup_test_app().await;

        for body in [
            serde_json::json!({"email": "not-an-email"}),
            serde_json::json!({"email": ""}),
            serde_json::json!({}),
        ] {
            let response = app.clone().oneshot(post_json("/api/email", body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let json = body_json(response).await;
            assert_eq!(json["error"], "Invalid email");
        }

        assert_eq!(email_count(&app).await, 0);
    }

    #[tokio::test]
    async fn generate_returns_blueprint() {
        let (app, _dir) = setup_test_app().await;

        let response = app
            .clone()
            .oneshot(post_json_from(
                "/api/generate",
                "9.9.9.9",
                serde_json::json!({"level": "advanced", "stack": "backend", "goal": "learning"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["blueprint"]["title"], "Distributed Task Queue");
    }

    #[tokio::test]
    async fn generate_unknown_combination_falls_back() {
        let (app, _dir) = setup_test_app().await;

        let response = app
            .clone()
            .oneshot(post_json_from(
                "/api/generate",
                "8.8.8.8",
                serde_json::json!({"level": "wizard", "stack": "cobol", "goal": "moonshot"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["blueprint"]["title"], "Personal Portfolio Site");
    }

    #[tokio::test]
    async fn generate_requires_all_fields() {
        let (app, _dir) = setup_test_app().await;

        for body in [
            serde_json::json!({}),
            serde_json::json!({"level": "beginner"}),
            serde_json::json!({"level": "beginner", "stack": "frontend", "goal": ""}),
        ] {
            let response = app
                .clone()
                .oneshot(post_json_from("/api/generate", "7.7.7.7", body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let json = body_json(response).await;
            assert_eq!(json["error"], "All fields required");
        }
    }

    #[tokio::test]
    async fn daily_limit_is_per_ip() {
        let (app, _dir) = setup_test_app().await;
        let body = serde_json::json!({"level": "beginner", "stack": "frontend", "goal": "portfolio"});

        let response = app
            .clone()
            .oneshot(post_json_from("/api/generate", "1.2.3.4", body.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Same IP, same day: limited
        let response = app
            .clone()
            .oneshot(post_json_from("/api/generate", "1.2.3.4", body.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        let json = body_json(response).await;
        assert!(json["error"].as_str().unwrap().contains("already generated"));

        // Different IP: unaffected
        let response = app
            .clone()
            .oneshot(post_json_from("/api/generate", "5.6.7.8", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn forwarded_header_wins_over_socket() {
        let (app, _dir) = setup_test_app().await;
        let body = serde_json::json!({"level": "beginner", "stack": "frontend", "goal": "portfolio"});

        // Exhaust the quota for the first forwarded entry only
        let response = app
            .clone()
            .oneshot(post_json_from("/api/generate", "9.9.9.9, 10.0.0.1", body.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(post_json_from("/api/generate", "10.0.0.1", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
