//! REST route registration for migration control.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Extension, Router};
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::domain::service::MigrationController;

/// Path prefix of every migration control route.
pub const BASE_PATH: &str = "/migration/v1";

/// Build the module router with the controller attached.
pub fn register_routes(svc: Arc<MigrationController>) -> Router {
    let api = Router::new()
        .route("/health", get(handlers::health))
        .route("/status", get(handlers::get_status))
        .route("/weight", get(handlers::get_weight).post(handlers::set_weight))
        .route("/control", post(handlers::control))
        .route(
            "/traffic-lock",
            get(handlers::get_traffic_lock).post(handlers::set_traffic_lock),
        )
        .route(
            "/traffic",
            get(handlers::traffic_stats).post(handlers::control_traffic),
        )
        .route("/deployment", get(handlers::get_deployment))
        .route("/deployment/start", post(handlers::deployment_start))
        .route("/deployment/result", post(handlers::deployment_result))
        .route("/arbiter/reset", post(handlers::reset_arbiter));

    Router::new()
        .nest(BASE_PATH, api)
        .layer(Extension(svc))
        .layer(TraceLayer::new_for_http())
}
