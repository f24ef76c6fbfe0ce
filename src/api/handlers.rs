use axum::{
    extract::{Path, State},
    Json,
};
use utoipa::OpenApi;

use super::{
    dto::{SensorStateDto, UpdateStatusDto},
    errors::AppError,
};
use crate::{
    coordinator::Coordinator,
    sensors::{
        descriptor::{DeviceClass, StateClass},
        MexField,
    },
};

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Every sensor with its descriptor and current value.
#[utoipa::path(
    get,
    path = "/sensors",
    responses(
        (status = 200, description = "All sensor states", body = Vec<SensorStateDto>),
    ),
    tag = "sensors"
)]
pub async fn list_sensors(State(coordinator): State<Coordinator>) -> Json<Vec<SensorStateDto>> {
    let states = coordinator.sensor_states().await;
    Json(states.into_iter().map(Into::into).collect())
}

/// One sensor by its vendor key, e.g. `CurrentVolume`.
#[utoipa::path(
    get,
    path = "/sensors/{key}",
    params(
        ("key" = String, Path, description = "Vendor field key"),
    ),
    responses(
        (status = 200, description = "Sensor state", body = SensorStateDto),
        (status = 404, description = "Unknown sensor key"),
    ),
    tag = "sensors"
)]
pub async fn get_sensor(
    State(coordinator): State<Coordinator>,
    Path(key): Path<String>,
) -> Result<Json<SensorStateDto>, AppError> {
    let field: MexField = key.parse().map_err(AppError::not_found)?;
    Ok(Json(coordinator.sensor_state(field).await.into()))
}

/// Outcome of the most recent poll cycle.
#[utoipa::path(
    get,
    path = "/status",
    responses(
        (status = 200, description = "Coordinator status", body = UpdateStatusDto),
    ),
    tag = "system"
)]
pub async fn get_status(State(coordinator): State<Coordinator>) -> Json<UpdateStatusDto> {
    let status = coordinator.status().await;
    Json(UpdateStatusDto::new(status, coordinator.interval().as_secs()))
}

/// Returns `200 OK` with `{"status":"ok"}` when the server is running.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy"),
    ),
    tag = "system"
)]
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// OpenAPI spec
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(
    paths(list_sensors, get_sensor, get_status, health),
    components(schemas(SensorStateDto, UpdateStatusDto, MexField, DeviceClass, StateClass)),
    tags(
        (name = "sensors", description = "MEX tank sensor endpoints"),
        (name = "system",  description = "System endpoints"),
    ),
    info(
        title = "Heizöl24 MEX API",
        version = "0.1.0",
        description = "Heating-oil tank readings from a Heizöl24 MEX sensor"
    )
)]
pub struct ApiDoc;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
