//! Storage Layer
//!
//! Read-only access to the station/measurement dataset through a pooled
//! SQLite connection.

mod models;
mod repository;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;

pub use models::{
    parse_date, DateRange, Measurement, PrecipitationObservation, Station, StationSummary,
    TemperatureObservation, TemperatureSummary,
};
pub use repository::{PoolSettings, Repository};

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Dataset missing, unreadable, or the pool could not hand out a connection
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),
    /// The query itself failed
    #[error("Query failure: {0}")]
    QueryFailure(String),
    /// Caller supplied a bad bound
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Configuration(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => StorageError::DataUnavailable(err.to_string()),
            sqlx::Error::Database(ref db) if is_unreadable_file(db.code().as_deref()) => {
                StorageError::DataUnavailable(err.to_string())
            }
            other => StorageError::QueryFailure(other.to_string()),
        }
    }
}

/// SQLITE_CANTOPEN (14) and SQLITE_NOTADB (26), extended codes included
fn is_unreadable_file(code: Option<&str>) -> bool {
    code.and_then(|c| c.parse::<i32>().ok())
        .map_or(false, |c| matches!(c & 0xff, 14 | 26))
}
