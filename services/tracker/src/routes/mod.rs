//! Tracker service routes

use anyhow::Result;
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, Method, header},
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use std::time::Duration;
use tower_http::cors::CorsLayer;

use crate::{middleware::auth_middleware, state::AppState};

pub mod ai;
pub mod issue;
pub mod user;

/// Create the router for the tracker service
pub fn create_router(state: AppState) -> Result<Router> {
    let cors = cors_layer(&state.config.cors_origin)?;

    let user_routes = Router::new()
        .route("/me", get(user::get_me).put(user::update_me))
        .route("/my-issues", get(user::my_issues))
        .route("/statistics", get(user::statistics))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .route("/register", post(user::register))
        .route("/login", post(user::login))
        .route("/logout", post(user::logout));

    let issue_routes = Router::new()
        .route("/", post(issue::create_issue))
        .route(
            "/:id",
            get(issue::get_issue)
                .patch(issue::update_issue)
                .delete(issue::delete_issue),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let ai_routes = Router::new()
        .route("/chat", post(ai::chat))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api = Router::new()
        .nest("/user", user_routes)
        .nest("/issue", issue_routes)
        .nest("/ai", ai_routes);

    Ok(Router::new()
        .route("/", get(welcome))
        .route("/health", get(health_check))
        .nest("/api", api)
        .layer(cors)
        .with_state(state))
}

/// CORS policy allowing the browser client to send its session cookie
pub fn cors_layer(origin: &str) -> Result<CorsLayer> {
    if origin.trim() == "*" {
        anyhow::bail!("Wildcard CORS origin cannot be combined with credentials");
    }

    let origin = HeaderValue::from_str(origin)
        .map_err(|e| anyhow::anyhow!("Invalid CORS origin {}: {}", origin, e))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60)))
}

/// Landing endpoint
pub async fn welcome() -> &'static str {
    "Welcome to the Issue Tracker API"
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = common::database::health_check(&state.db_pool)
        .await
        .unwrap_or(false);

    Json(json!({
        "status": "ok",
        "service": "tracker",
        "database": database,
    }))
}
