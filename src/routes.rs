//! Router assembly.

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{self, AppState};
use crate::openapi;

pub const BASE_PATH: &str = "/prospect-pessoa-fisica";

/// Prospect CRUD and service queue endpoints under [`BASE_PATH`].
pub fn prospect_routes() -> Router<Arc<AppState>> {
    let collection = get(handlers::list_prospects).post(handlers::create_prospect);

    Router::new()
        .route(BASE_PATH, collection.clone())
        .route(&format!("{BASE_PATH}/"), collection)
        .route(
            &format!("{BASE_PATH}/service-queue"),
            get(handlers::get_service_queue),
        )
        .route(
            &format!("{BASE_PATH}/service-queue/next-prospect"),
            get(handlers::next_prospect),
        )
        .route(
            &format!("{BASE_PATH}/:id"),
            get(handlers::get_prospect)
                .put(handlers::update_prospect)
                .delete(handlers::delete_prospect),
        )
}

/// Builds the full application.
///
/// `protect` wraps the prospect routes only (rate limiting, body limits), so
/// `/health` and the docs stay reachable when a client is throttled.
pub fn build_app<F>(state: Arc<AppState>, protect: F) -> Router
where
    F: FnOnce(Router<Arc<AppState>>) -> Router<Arc<AppState>>,
{
    let cors = CorsLayer::permissive()
        .max_age(Duration::from_secs(state.config.cors_max_age_secs));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/docs", get(openapi::serve_swagger_ui))
        .route("/api-docs/openapi.json", get(openapi::serve_openapi_spec))
        .merge(protect(prospect_routes()))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
