//! Repository Implementation

use crate::{
    DateRange, PrecipitationObservation, StationSummary, StorageError, TemperatureObservation,
    TemperatureSummary,
};
use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Tables the dataset must provide
const REQUIRED_TABLES: [&str; 2] = ["station", "measurement"];

/// Connection pool sizing
#[derive(Debug, Clone)]
pub struct PoolSettings {
    /// Upper bound on open connections
    pub max_connections: u32,
    /// How long a query waits for a free connection
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 5,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// Read-only repository over the climate dataset.
///
/// Cloning is cheap: clones share one connection pool, and each query
/// borrows a connection only for its own duration.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Open an existing dataset file.
    ///
    /// The file is opened read-only and is never created. A missing file,
    /// an unreadable file, or a file without the expected tables fails with
    /// [`StorageError::DataUnavailable`].
    pub async fn open(path: impl AsRef<Path>, settings: &PoolSettings) -> Result<Self, StorageError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(StorageError::DataUnavailable(format!(
                "Dataset not found at {}",
                path.display()
            )));
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .read_only(true)
            .create_if_missing(false);

        let pool = SqlitePoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.acquire_timeout)
            .connect_with(options)
            .await
            .map_err(|e| {
                StorageError::DataUnavailable(format!(
                    "Failed to open {}: {}",
                    path.display(),
                    e
                ))
            })?;

        let repository = Self { pool };
        if let Err(e) = repository.check_schema().await {
            repository.close().await;
            return Err(match e {
                StorageError::DataUnavailable(msg) => StorageError::DataUnavailable(msg),
                other => StorageError::DataUnavailable(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    other
                )),
            });
        }

        info!(
            path = %path.display(),
            max_connections = settings.max_connections,
            "Opened climate dataset"
        );
        Ok(repository)
    }

    async fn check_schema(&self) -> Result<(), StorageError> {
        for table in REQUIRED_TABLES {
            let found: Option<(String,)> =
                sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1")
                    .bind(table)
                    .fetch_optional(&self.pool)
                    .await?;

            if found.is_none() {
                warn!(table, "Dataset is missing a required table");
                return Err(StorageError::DataUnavailable(format!(
                    "Dataset has no '{}' table",
                    table
                )));
            }
        }
        Ok(())
    }

    /// Round-trip a trivial query
    pub async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close every pooled connection; later queries fail with `DataUnavailable`
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed climate dataset");
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    /// Date and precipitation of every measurement within `range`
    pub async fn list_precipitation(
        &self,
        range: DateRange,
    ) -> Result<Vec<PrecipitationObservation>, StorageError> {
        // CAST keeps integer-stored values decodable as f64
        let rows = sqlx::query_as::<_, PrecipitationObservation>(
            "SELECT date, CAST(prcp AS REAL) AS prcp
             FROM measurement
             WHERE date BETWEEN ?1 AND ?2
             ORDER BY id",
        )
        .bind(range.start())
        .bind(range.end())
        .fetch_all(&self.pool)
        .await?;

        debug!(rows = rows.len(), start = %range.start(), end = %range.end(), "Listed precipitation");
        Ok(rows)
    }

    /// One entry per station code
    pub async fn list_stations(&self) -> Result<Vec<StationSummary>, StorageError> {
        let rows = sqlx::query_as::<_, StationSummary>(
            "SELECT station, name
             FROM station
             GROUP BY station
             ORDER BY station",
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(rows = rows.len(), "Listed stations");
        Ok(rows)
    }

    /// Station and observed temperature of every measurement within `range`
    pub async fn list_temperature_observations(
        &self,
        range: DateRange,
    ) -> Result<Vec<TemperatureObservation>, StorageError> {
        let rows = sqlx::query_as::<_, TemperatureObservation>(
            "SELECT station, CAST(tobs AS REAL) AS tobs
             FROM measurement
             WHERE date BETWEEN ?1 AND ?2
             ORDER BY id",
        )
        .bind(range.start())
        .bind(range.end())
        .fetch_all(&self.pool)
        .await?;

        debug!(rows = rows.len(), start = %range.start(), end = %range.end(), "Listed temperature observations");
        Ok(rows)
    }

    /// Max, min and mean temperature over measurements dated `start` or later
    pub async fn temperature_summary_since(
        &self,
        start: NaiveDate,
    ) -> Result<TemperatureSummary, StorageError> {
        let summary = sqlx::query_as::<_, TemperatureSummary>(
            "SELECT CAST(MAX(tobs) AS REAL) AS tmax,
                    CAST(MIN(tobs) AS REAL) AS tmin,
                    AVG(tobs) AS tavg
             FROM measurement
             WHERE date >= ?1",
        )
        .bind(start)
        .fetch_one(&self.pool)
        .await?;

        debug!(%start, ?summary, "Summarized temperatures");
        Ok(summary)
    }

    /// Max, min and mean temperature over measurements within `range`
    pub async fn temperature_summary_between(
        &self,
        range: DateRange,
    ) -> Result<TemperatureSummary, StorageError> {
        let summary = sqlx::query_as::<_, TemperatureSummary>(
            "SELECT CAST(MAX(tobs) AS REAL) AS tmax,
                    CAST(MIN(tobs) AS REAL) AS tmin,
                    AVG(tobs) AS tavg
             FROM measurement
             WHERE date BETWEEN ?1 AND ?2",
        )
        .bind(range.start())
        .bind(range.end())
        .fetch_one(&self.pool)
        .await?;

        debug!(start = %range.start(), end = %range.end(), ?summary, "Summarized temperatures");
        Ok(summary)
    }
}
