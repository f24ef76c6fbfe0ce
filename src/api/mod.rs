pub mod dto;
pub mod errors;
pub mod handlers;

use axum::{routing::get, Router};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

use crate::coordinator::Coordinator;

use handlers::ApiDoc;

pub fn router(coordinator: Coordinator) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .route("/sensors", get(handlers::list_sensors))
        .route("/sensors/{key}", get(handlers::get_sensor))
        .route("/status", get(handlers::get_status))
        .with_state(coordinator)
        .split_for_parts();

    router
        .route("/health", get(handlers::health))
        .route(
            "/api-docs/openapi.json",
            get(move || async move { axum::Json(api) }),
        )
}
