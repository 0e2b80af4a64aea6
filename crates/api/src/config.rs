//! Layered configuration: built-in defaults, an optional TOML file, then
//! `CLIMATE_*` environment variables.

use chrono::NaiveDate;
use climate_storage::{DateRange, PoolSettings, StorageError};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// HTTP listener
    pub server: ServerSettings,
    /// Dataset location and pool sizing
    pub database: DatabaseSettings,
    /// Log filter and output format
    pub logging: LoggingSettings,
    /// Default date bounds per route
    pub windows: WindowSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Address the HTTP listener binds to
    pub bind_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Existing SQLite dataset, opened read-only
    pub path: PathBuf,
    /// Upper bound on pooled connections
    pub max_connections: u32,
    /// Seconds a query waits for a free connection
    pub acquire_timeout_secs: u64,
}

impl DatabaseSettings {
    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            max_connections: self.max_connections,
            acquire_timeout: Duration::from_secs(self.acquire_timeout_secs),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

/// Date bounds applied when a route gets no caller-supplied dates
#[derive(Debug, Clone, Deserialize)]
pub struct WindowSettings {
    /// Inclusive start of the precipitation and tobs window
    pub recent_start: NaiveDate,
    /// Inclusive end of the recent window
    pub recent_end: NaiveDate,
    /// Lower bound of `calc_temps/(start)`
    pub summary_start: NaiveDate,
    /// Inclusive start of the `calc_temps/(end)` window
    pub summary_range_start: NaiveDate,
    /// Inclusive end of the `calc_temps/(end)` window
    pub summary_range_end: NaiveDate,
}

impl WindowSettings {
    pub fn recent(&self) -> Result<DateRange, StorageError> {
        DateRange::new(self.recent_start, self.recent_end)
    }

    pub fn summary_range(&self) -> Result<DateRange, StorageError> {
        DateRange::new(self.summary_range_start, self.summary_range_end)
    }
}

impl Settings {
    /// Load settings; a missing file at `path` is not an error
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        defaults()?
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("CLIMATE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("server.bind_addr", "0.0.0.0:8080")?
        .set_default("database.path", "Hawaii.sqlite")?
        .set_default("database.max_connections", 5_i64)?
        .set_default("database.acquire_timeout_secs", 5_i64)?
        .set_default("logging.level", "info")?
        .set_default("logging.json", false)?
        .set_default("windows.recent_start", "2016-08-24")?
        .set_default("windows.recent_end", "2017-08-23")?
        .set_default("windows.summary_start", "2012-08-24")?
        .set_default("windows.summary_range_start", "2015-08-01")?
        .set_default("windows.summary_range_end", "2017-08-23")
}

#[cfg(test)]
pub(crate) fn from_toml(toml: &str) -> Result<Settings, ConfigError> {
    defaults()?
        .add_source(File::from_str(toml, config::FileFormat::Toml))
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = from_toml("").unwrap();
        assert_eq!(settings.server.bind_addr, "0.0.0.0:8080");
        assert_eq!(settings.database.path, PathBuf::from("Hawaii.sqlite"));
        assert_eq!(settings.database.max_connections, 5);
        assert!(!settings.logging.json);

        let recent = settings.windows.recent().unwrap();
        assert_eq!(recent.start().to_string(), "2016-08-24");
        assert_eq!(recent.end().to_string(), "2017-08-23");
        assert_eq!(settings.windows.summary_start.to_string(), "2012-08-24");

        let range = settings.windows.summary_range().unwrap();
        assert_eq!(range.start().to_string(), "2015-08-01");
        assert_eq!(range.end().to_string(), "2017-08-23");
    }

    #[test]
    fn test_file_overrides() {
        let settings = from_toml(
            r#"
            [database]
            path = "/data/climate.sqlite"
            max_connections = 2

            [windows]
            recent_start = "2017-01-01"
            "#,
        )
        .unwrap();

        assert_eq!(settings.database.path, PathBuf::from("/data/climate.sqlite"));
        assert_eq!(settings.database.pool_settings().max_connections, 2);
        assert_eq!(
            settings.database.pool_settings().acquire_timeout,
            Duration::from_secs(5)
        );
        assert_eq!(settings.windows.recent_start.to_string(), "2017-01-01");
        assert_eq!(settings.windows.recent_end.to_string(), "2017-08-23");
    }

    #[test]
    fn test_bad_window_date_rejected() {
        let result = from_toml(
            r#"
            [windows]
            recent_start = "yesterday"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let settings = Settings::load(Path::new("/nonexistent/climate-api.toml")).unwrap();
        assert_eq!(settings.logging.level, "info");
    }
}
