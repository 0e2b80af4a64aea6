//! Query Service
//!
//! Chooses the date bounds for each route and forwards to the repository.

use crate::config::WindowSettings;
use chrono::NaiveDate;
use climate_storage::{
    parse_date, DateRange, PrecipitationObservation, Repository, StationSummary, StorageError,
    TemperatureObservation, TemperatureSummary,
};

/// Path placeholder served with the configured `summary_start`
pub const START_PLACEHOLDER: &str = "(start)";
/// Path placeholder served with the configured summary window
pub const END_PLACEHOLDER: &str = "(end)";

/// Lower bound segment of `calc_temps/{start}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryBound {
    /// Literal `(start)`
    DefaultStart,
    /// Literal `(end)`, which stands for the whole default window
    DefaultRange,
    Since(NaiveDate),
}

impl SummaryBound {
    pub fn parse(segment: &str) -> Result<Self, StorageError> {
        match segment {
            START_PLACEHOLDER => Ok(SummaryBound::DefaultStart),
            END_PLACEHOLDER => Ok(SummaryBound::DefaultRange),
            other => parse_date(other).map(SummaryBound::Since),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WeatherService {
    repository: Repository,
    windows: WindowSettings,
}

impl WeatherService {
    pub fn new(repository: Repository, windows: WindowSettings) -> Self {
        Self {
            repository,
            windows,
        }
    }

    pub fn windows(&self) -> &WindowSettings {
        &self.windows
    }

    /// Precipitation within the default recent window, or the caller's bounds
    pub async fn precipitation(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<PrecipitationObservation>, StorageError> {
        let range = override_range(self.windows.recent()?, start, end)?;
        self.repository.list_precipitation(range).await
    }

    pub async fn stations(&self) -> Result<Vec<StationSummary>, StorageError> {
        self.repository.list_stations().await
    }

    /// Station codes and names interleaved in one flat list
    pub async fn stations_flat(&self) -> Result<Vec<String>, StorageError> {
        Ok(self
            .stations()
            .await?
            .into_iter()
            .flat_map(|s| [s.station, s.name])
            .collect())
    }

    pub async fn temperature_observations(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<TemperatureObservation>, StorageError> {
        let range = override_range(self.windows.recent()?, start, end)?;
        self.repository.list_temperature_observations(range).await
    }

    pub async fn temperature_summary(
        &self,
        bound: SummaryBound,
    ) -> Result<TemperatureSummary, StorageError> {
        match bound {
            SummaryBound::DefaultStart => {
                self.repository
                    .temperature_summary_since(self.windows.summary_start)
                    .await
            }
            SummaryBound::DefaultRange => {
                self.repository
                    .temperature_summary_between(self.windows.summary_range()?)
                    .await
            }
            SummaryBound::Since(start) => self.repository.temperature_summary_since(start).await,
        }
    }

    /// Summary over `start..=end`; placeholders fall back to the default window
    pub async fn temperature_summary_between(
        &self,
        start: &str,
        end: &str,
    ) -> Result<TemperatureSummary, StorageError> {
        let start = match start {
            START_PLACEHOLDER => None,
            other => Some(parse_date(other)?),
        };
        let end = match end {
            END_PLACEHOLDER => None,
            other => Some(parse_date(other)?),
        };
        let range = override_range(self.windows.summary_range()?, start, end)?;
        self.repository.temperature_summary_between(range).await
    }
}

fn override_range(
    default: DateRange,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<DateRange, StorageError> {
    DateRange::new(
        start.unwrap_or(default.start()),
        end.unwrap_or(default.end()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use climate_storage::fixtures::{measurement, station, Dataset};

    fn windows() -> WindowSettings {
        WindowSettings {
            recent_start: parse_date("2017-01-01").unwrap(),
            recent_end: parse_date("2017-01-31").unwrap(),
            summary_start: parse_date("2017-01-02").unwrap(),
            summary_range_start: parse_date("2016-12-01").unwrap(),
            summary_range_end: parse_date("2017-01-01").unwrap(),
        }
    }

    async fn dataset() -> Dataset {
        Dataset::create(
            &[station("USC1", "Honolulu"), station("USC2", "Kaneohe")],
            &[
                measurement(1, "USC1", "2016-12-31", Some(0.0), Some(60.0)),
                measurement(2, "USC1", "2017-01-01", Some(0.5), Some(70.0)),
                measurement(3, "USC2", "2017-01-02", None, Some(72.0)),
                measurement(4, "USC2", "2017-02-01", Some(1.0), Some(75.0)),
            ],
        )
        .await
        .unwrap()
    }

    #[test]
    fn test_summary_bound_parse() {
        assert_eq!(
            SummaryBound::parse("(start)").unwrap(),
            SummaryBound::DefaultStart
        );
        assert_eq!(
            SummaryBound::parse("(end)").unwrap(),
            SummaryBound::DefaultRange
        );
        assert_eq!(
            SummaryBound::parse("2017-01-02").unwrap(),
            SummaryBound::Since(parse_date("2017-01-02").unwrap())
        );
        assert!(matches!(
            SummaryBound::parse("start"),
            Err(StorageError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn test_default_window() {
        let dataset = dataset().await;
        let service = WeatherService::new(dataset.open().await.unwrap(), windows());

        let rows = service.precipitation(None, None).await.unwrap();
        assert_eq!(rows.len(), 2);

        let rows = service
            .precipitation(Some(parse_date("2016-12-31").unwrap()), None)
            .await
            .unwrap();
        assert_eq!(rows.len(), 3);

        let tobs = service.temperature_observations(None, None).await.unwrap();
        assert_eq!(tobs[0].station, "USC1");
        assert_eq!(tobs[1].station, "USC2");
    }

    #[tokio::test]
    async fn test_reversed_override_rejected() {
        let dataset = dataset().await;
        let service = WeatherService::new(dataset.open().await.unwrap(), windows());

        let err = service
            .precipitation(None, Some(parse_date("2016-01-01").unwrap()))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_placeholder_summaries() {
        let dataset = dataset().await;
        let service = WeatherService::new(dataset.open().await.unwrap(), windows());

        let since = service
            .temperature_summary(SummaryBound::DefaultStart)
            .await
            .unwrap();
        assert_eq!(since.tmin, Some(72.0));
        assert_eq!(since.tmax, Some(75.0));

        let range = service
            .temperature_summary(SummaryBound::DefaultRange)
            .await
            .unwrap();
        assert_eq!(range.tmin, Some(60.0));
        assert_eq!(range.tmax, Some(70.0));
        assert_eq!(range.tavg, Some(65.0));

        let explicit = service
            .temperature_summary_between("(start)", "(end)")
            .await
            .unwrap();
        assert_eq!(explicit, range);
    }

    #[tokio::test]
    async fn test_flat_station_list() {
        let dataset = dataset().await;
        let service = WeatherService::new(dataset.open().await.unwrap(), windows());

        assert_eq!(
            service.stations_flat().await.unwrap(),
            vec!["USC1", "Honolulu", "USC2", "Kaneohe"]
        );
    }
}
