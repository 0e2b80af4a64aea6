//! Temperature summary routes
//!
//! Each returns a one-element array so the shape matches the other list routes.

use axum::{
    extract::{Path, State},
    Json,
};
use climate_storage::TemperatureSummary;
use std::sync::Arc;

use crate::service::SummaryBound;
use crate::{AppState, HandlerResult};

/// GET /api/v1.0/calc_temps/:start
pub async fn get_summary_since(
    State(state): State<Arc<AppState>>,
    Path(start): Path<String>,
) -> HandlerResult<Vec<TemperatureSummary>> {
    let bound = SummaryBound::parse(&start)?;
    let summary = state.service.temperature_summary(bound).await?;
    Ok(Json(vec![summary]))
}

/// GET /api/v1.0/calc_temps/:start/:end
pub async fn get_summary_between(
    State(state): State<Arc<AppState>>,
    Path((start, end)): Path<(String, String)>,
) -> HandlerResult<Vec<TemperatureSummary>> {
    let summary = state
        .service
        .temperature_summary_between(&start, &end)
        .await?;
    Ok(Json(vec![summary]))
}
