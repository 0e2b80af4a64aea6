//! Route handlers

pub mod observations;
pub mod stations;
pub mod temperature;

use axum::{extract::State, http::Uri};
use chrono::NaiveDate;
use climate_storage::{parse_date, StorageError};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::AppError;
use crate::AppState;

/// Optional `?start=YYYY-MM-DD&end=YYYY-MM-DD` overrides
#[derive(Debug, Default, Deserialize)]
pub struct WindowQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl WindowQuery {
    pub fn bounds(&self) -> Result<(Option<NaiveDate>, Option<NaiveDate>), StorageError> {
        let start = self.start.as_deref().map(parse_date).transpose()?;
        let end = self.end.as_deref().map(parse_date).transpose()?;
        Ok((start, end))
    }
}

/// Plain-text list of the available routes
pub async fn welcome(State(state): State<Arc<AppState>>) -> String {
    let w = state.service.windows();
    format!(
        "Available Routes:\n\
         /api/v1.0/precipitation\n    dates and precipitation observations from {} to {}\n\
         /api/v1.0/stations\n    list of stations in the dataset\n\
         /api/v1.0/tobs\n    temperature observations from {} to {}\n\
         /api/v1.0/calc_temps/<start>\n    TMIN, TAVG and TMAX for all dates on or after start ((start) = {})\n\
         /api/v1.0/calc_temps/<start>/<end>\n    TMIN, TAVG and TMAX for dates between start and end inclusive ((end) = {} to {})\n",
        w.recent_start,
        w.recent_end,
        w.recent_start,
        w.recent_end,
        w.summary_start,
        w.summary_range_start,
        w.summary_range_end,
    )
}

pub async fn not_found(uri: Uri) -> AppError {
    AppError::RouteNotFound(uri.path().to_string())
}
