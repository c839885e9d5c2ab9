use anyhow::{Context, Result};

use crate::{
    config::Config,
    feed::FeedClient,
    geo::{Coordinate, GridIndex},
    model::{Envelope, Forecast, Lang, LocalWeather, RainfallNowcast, Status, UvReport, WarningSummary},
    parse,
};

const LOCAL_GRID_JSON: &str = include_str!("../assets/grid_location.json");
const RAINFALL_GRID_JSON: &str = include_str!("../assets/rainfall_nowcast_mapping.json");

/// Orchestrates the five retrieval operations. Each call runs
/// validate -> resolve (geo feeds) -> fetch -> parse and reports its outcome
/// solely through the envelope's status; no error escapes a call. The grid
/// datasets are loaded once here and shared read-only across calls, so the
/// service can be used concurrently without coordination.
#[derive(Debug)]
pub struct WeatherService {
    feed: FeedClient,
    local_grid: GridIndex,
    rainfall_grid: GridIndex,
}

impl WeatherService {
    pub fn new(config: &Config) -> Result<Self> {
        let feed = FeedClient::new(config)?;
        Self::with_feed(feed, config)
    }

    /// Build on top of an existing feed client; tests use this to inject a
    /// mock transport.
    pub fn with_feed(feed: FeedClient, config: &Config) -> Result<Self> {
        let local_grid = GridIndex::from_json(LOCAL_GRID_JSON, config.local_coverage_km)
            .context("Local-weather grid dataset is unusable")?;
        let rainfall_grid = GridIndex::from_json(RAINFALL_GRID_JSON, config.rainfall_coverage_km)
            .context("Rainfall grid dataset is unusable")?;

        Ok(Self { feed, local_grid, rainfall_grid })
    }

    /// Current weather for the grid cell nearest to `query`. On success the
    /// envelope also carries the resolved place name.
    pub async fn local_weather(&self, query: Coordinate) -> Envelope<LocalWeather> {
        if !query.in_range() {
            return Envelope::empty(Status::Invalid);
        }

        let nearest = self.local_grid.nearest(query);
        if nearest.distance_km > self.local_grid.coverage_km() {
            tracing::debug!(
                distance_km = nearest.distance_km,
                "query outside local-weather grid coverage"
            );
            return Envelope::empty(Status::OutOfCoverage);
        }

        let url = self.feed.local_weather_url(&nearest.point.id);
        let place = nearest.point.name.clone();

        let raw = match self.feed.get_text(&url).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(%err, "local-weather fetch failed");
                return Envelope::empty(Status::NetworkFailure);
            }
        };

        match parse::local_weather(&raw) {
            Ok(weather) => Envelope::success_at(weather, place),
            Err(err) => {
                tracing::warn!(%err, "local-weather payload did not parse");
                Envelope::empty(Status::ParseFailure)
            }
        }
    }

    /// Two-hour rainfall nowcast for the grid cell nearest to `query`.
    pub async fn rainfall_nowcast(&self, query: Coordinate) -> Envelope<RainfallNowcast> {
        if !query.in_range() {
            return Envelope::empty(Status::Invalid);
        }

        let nearest = self.rainfall_grid.nearest(query);
        if nearest.distance_km > self.rainfall_grid.coverage_km() {
            tracing::debug!(
                distance_km = nearest.distance_km,
                "query outside rainfall grid coverage"
            );
            return Envelope::empty(Status::OutOfCoverage);
        }

        let url = self
            .feed
            .rainfall_nowcast_url(nearest.point.lat, nearest.point.lng);

        let raw = match self.feed.get_text(&url).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(%err, "rainfall fetch failed");
                return Envelope::empty(Status::NetworkFailure);
            }
        };

        match parse::rainfall_nowcast(&raw) {
            Ok(nowcast) => Envelope::success(nowcast),
            Err(err) => {
                tracing::warn!(%err, "rainfall payload did not parse");
                Envelope::empty(Status::ParseFailure)
            }
        }
    }

    /// Today's maximum UV index forecast. If a payload was obtained but the
    /// sentence does not match the expected shape, the raw text is surfaced
    /// as a partial success instead of being discarded.
    pub async fn uv_index(&self, lang: Lang) -> Envelope<UvReport> {
        let url = self.feed.uv_index_url(lang);

        let raw = match self.feed.get_text(&url).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(%err, "uv-index fetch failed");
                return Envelope::empty(Status::NetworkFailure);
            }
        };

        match parse::uv_index(&raw, lang) {
            Ok(report) => Envelope::success(report),
            Err(err) if !raw.trim().is_empty() => {
                tracing::warn!(%err, "uv-index payload did not parse, surfacing raw text");
                Envelope::partial(raw)
            }
            Err(err) => {
                tracing::warn!(%err, "uv-index payload was empty");
                Envelope::empty(Status::ParseFailure)
            }
        }
    }

    /// Weather warnings currently in force.
    pub async fn weather_warning(&self, lang: Lang) -> Envelope<WarningSummary> {
        let url = self.feed.weather_warning_url(lang);

        let raw = match self.feed.get_text(&url).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(%err, "warning fetch failed");
                return Envelope::empty(Status::NetworkFailure);
            }
        };

        match parse::weather_warning(&raw) {
            Ok(summary) => Envelope::success(summary),
            Err(err) => {
                tracing::warn!(%err, "warning payload did not parse");
                Envelope::empty(Status::ParseFailure)
            }
        }
    }

    /// Multi-day weather forecast.
    pub async fn forecast(&self, lang: Lang) -> Envelope<Forecast> {
        let url = self.feed.forecast_url(lang);

        let raw = match self.feed.get_text(&url).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(%err, "forecast fetch failed");
                return Envelope::empty(Status::NetworkFailure);
            }
        };

        match parse::forecast(&raw) {
            Ok(forecast) => Envelope::success(forecast),
            Err(err) => {
                tracing::warn!(%err, "forecast payload did not parse");
                Envelope::empty(Status::ParseFailure)
            }
        }
    }
}
