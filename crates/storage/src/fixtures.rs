//! Seeded on-disk datasets for tests.

use crate::{Measurement, PoolSettings, Repository, Station, StorageError};
use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Table layout of the climate dataset
pub const SCHEMA: [&str; 2] = [
    "CREATE TABLE station (
        station TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        latitude REAL,
        longitude REAL,
        elevation REAL
    )",
    "CREATE TABLE measurement (
        id INTEGER PRIMARY KEY,
        station TEXT NOT NULL,
        date TEXT NOT NULL,
        prcp REAL,
        tobs REAL
    )",
];

/// SQLite file in a temporary directory, removed on drop
pub struct Dataset {
    _dir: TempDir,
    path: PathBuf,
}

impl Dataset {
    /// Write a fresh dataset holding the given rows
    pub async fn create(
        stations: &[Station],
        measurements: &[Measurement],
    ) -> Result<Self, StorageError> {
        let dir = tempfile::tempdir()
            .map_err(|e| StorageError::DataUnavailable(format!("Temp dir: {}", e)))?;
        let path = dir.path().join("climate.sqlite");

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        for statement in SCHEMA {
            sqlx::query(statement).execute(&pool).await?;
        }

        for s in stations {
            sqlx::query(
                "INSERT INTO station (station, name, latitude, longitude, elevation)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .bind(&s.station)
            .bind(&s.name)
            .bind(s.latitude)
            .bind(s.longitude)
            .bind(s.elevation)
            .execute(&pool)
            .await?;
        }

        for m in measurements {
            sqlx::query(
                "INSERT INTO measurement (id, station, date, prcp, tobs)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .bind(m.id)
            .bind(&m.station)
            .bind(m.date)
            .bind(m.prcp)
            .bind(m.tobs)
            .execute(&pool)
            .await?;
        }

        pool.close().await;

        Ok(Self { _dir: dir, path })
    }

    /// The single-station dataset used by the end-to-end scenarios
    pub async fn honolulu() -> Result<Self, StorageError> {
        Self::create(
            &[station("USC1", "Honolulu")],
            &[
                measurement(1, "USC1", "2017-01-01", Some(0.5), Some(70.0)),
                measurement(2, "USC1", "2017-01-02", None, Some(72.0)),
            ],
        )
        .await
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the dataset read-only with default pool settings
    pub async fn open(&self) -> Result<Repository, StorageError> {
        Repository::open(&self.path, &PoolSettings::default()).await
    }
}

/// Station without coordinates
pub fn station(code: &str, name: &str) -> Station {
    Station {
        station: code.to_string(),
        name: name.to_string(),
        latitude: None,
        longitude: None,
        elevation: None,
    }
}

/// Measurement row; panics on a malformed date
pub fn measurement(
    id: i64,
    station: &str,
    date: &str,
    prcp: Option<f64>,
    tobs: Option<f64>,
) -> Measurement {
    Measurement {
        id,
        station: station.to_string(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("fixture date"),
        prcp,
        tobs,
    }
}
