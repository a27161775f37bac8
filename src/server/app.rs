//! Router assembly.

use std::sync::Arc;

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, Method};
use axum::routing::{get, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::queue::Controller;

use super::routes::{health_handler, job, queue};

pub type AppState = Arc<Controller>;

/// The request deadline from the external API's published contract.
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

pub fn build_app(controller: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(super::middleware::ACCESS_KEY_HEADER)]);

    Router::new()
        .route("/test", get(health_handler))
        .route(
            "/api/v1/queue",
            put(queue::create_queue).get(queue::get_queue).delete(queue::delete_queue),
        )
        .route(
            "/api/v1/job",
            put(job::add_job).get(job::get_job).post(job::update_job_status).delete(job::delete_job),
        )
        .route("/api/v1/job/next", get(job::get_next_job))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(cors)
        .with_state(controller)
}
