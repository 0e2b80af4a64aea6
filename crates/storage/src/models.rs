//! Record types for the station and measurement tables and the
//! projections served from them.

use crate::StorageError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row of the `station` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Station {
    /// Unique station code, e.g. `USC00519397`
    pub station: String,
    /// Display name
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Meters above sea level
    pub elevation: Option<f64>,
}

/// Row of the `measurement` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Measurement {
    /// Row id, also the storage order
    pub id: i64,
    /// Station code, not enforced as a foreign key
    pub station: String,
    pub date: NaiveDate,
    /// `None` when no rainfall was recorded
    pub prcp: Option<f64>,
    /// Observed temperature
    pub tobs: Option<f64>,
}

/// Date and precipitation of one measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PrecipitationObservation {
    /// Observation day, serialized as `YYYY-MM-DD`
    pub date: NaiveDate,
    /// Rainfall, `null` when none was recorded
    pub prcp: Option<f64>,
}

/// Station code and display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct StationSummary {
    /// Station code
    pub station: String,
    /// Display name
    pub name: String,
}

/// Station and observed temperature of one measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct TemperatureObservation {
    /// Code of the reporting station
    pub station: String,
    /// Observed temperature, `null` when missing
    pub tobs: Option<f64>,
}

/// Aggregate over observed temperatures.
///
/// Every field is `None` when no measurement matched.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, FromRow)]
pub struct TemperatureSummary {
    /// Mean
    #[serde(rename = "TAVG")]
    pub tavg: Option<f64>,
    /// Maximum
    #[serde(rename = "TMAX")]
    pub tmax: Option<f64>,
    /// Minimum
    #[serde(rename = "TMIN")]
    pub tmin: Option<f64>,
}

/// Date window including both `start` and `end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a range, rejecting `start > end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, StorageError> {
        if start > end {
            return Err(StorageError::InvalidArgument(format!(
                "Start date {} is after end date {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Parse both bounds from `YYYY-MM-DD` text
    pub fn parse(start: &str, end: &str) -> Result<Self, StorageError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> Result<NaiveDate, StorageError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| {
        StorageError::InvalidArgument(format!("Invalid date '{}': {}", value, e))
    })
}
