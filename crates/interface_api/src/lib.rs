//! HTTP API Layer
//!
//! This crate exposes the travel delay claims service over REST using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for claims and health
//! - **Middleware**: Tracing, CORS, audit logging
//! - **DTOs**: Request/Response data transfer objects with declarative validation
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::create_router;
//!
//! let app = create_router(service, config);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
    middleware as axum_middleware,
};
use tower_http::trace::TraceLayer;
use tower_http::cors::{CorsLayer, Any};

use domain_claims::ClaimService;

use crate::config::ApiConfig;
use crate::middleware::audit_middleware;
use crate::handlers::{claims, health};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ClaimService>,
    pub config: ApiConfig,
}

/// Creates the main API router
///
/// # Arguments
///
/// * `service` - Claims service backed by the configured repository
/// * `config` - API configuration
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(service: Arc<ClaimService>, config: ApiConfig) -> Router {
    let state = AppState { service, config };

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let claims_routes = Router::new()
        .route("/submit", post(claims::submit_claim))
        .route("/today", get(claims::list_todays_claims))
        .route("/review/pending", get(claims::list_review_claims))
        .route("/stats/status", get(claims::status_statistics))
        .route("/policy/:policy_number", get(claims::list_policy_claims))
        .route("/:claim_number", get(claims::get_claim))
        .route("/:claim_number/review", post(claims::review_claim))
        .route("/:claim_number/pay", post(claims::pay_claim));

    let api_routes = Router::new()
        .nest("/claims", claims_routes)
        .layer(axum_middleware::from_fn_with_state(state.clone(), audit_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
