//! Station Routes

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::AppError;
use crate::AppState;

/// Output shape of the station list
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StationFormat {
    /// `[{"station": .., "name": ..}]`
    #[default]
    Records,
    /// `["USC1", "Honolulu", ...]`
    Flat,
}

#[derive(Debug, Deserialize)]
pub struct StationQuery {
    /// `records` (default) or `flat`
    #[serde(default)]
    pub format: StationFormat,
}

/// GET /api/v1.0/stations
pub async fn get_stations(
    State(state): State<Arc<AppState>>,
    query: Result<Query<StationQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(params) = query?;
    let response = match params.format {
        StationFormat::Records => Json(state.service.stations().await?).into_response(),
        StationFormat::Flat => Json(state.service.stations_flat().await?).into_response(),
    };
    Ok(response)
}
