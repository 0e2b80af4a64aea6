//! Per-measurement observation routes

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use climate_storage::{PrecipitationObservation, TemperatureObservation};
use std::sync::Arc;

use super::WindowQuery;
use crate::{AppState, HandlerResult};

/// GET /api/v1.0/precipitation
pub async fn get_precipitation(
    State(state): State<Arc<AppState>>,
    query: Result<Query<WindowQuery>, QueryRejection>,
) -> HandlerResult<Vec<PrecipitationObservation>> {
    let Query(params) = query?;
    let (start, end) = params.bounds()?;
    let data = state.service.precipitation(start, end).await?;
    Ok(Json(data))
}

/// GET /api/v1.0/tobs
pub async fn get_tobs(
    State(state): State<Arc<AppState>>,
    query: Result<Query<WindowQuery>, QueryRejection>,
) -> HandlerResult<Vec<TemperatureObservation>> {
    let Query(params) = query?;
    let (start, end) = params.bounds()?;
    let data = state.service.temperature_observations(start, end).await?;
    Ok(Json(data))
}
