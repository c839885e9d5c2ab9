use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::{fmt::Debug, time::Duration};
use thiserror::Error;

use crate::{config::Config, model::Lang};

/// Transport-level failure. Distinct from a parse failure by construction:
/// if a `FeedError` is returned, no payload was obtained at all.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

/// The single outbound seam of the crate: one GET, text body back.
/// Implemented by [`HttpTransport`] in production and by mocks in tests.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn get_text(&self, url: &str) -> Result<String, FeedError>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_text(&self, url: &str) -> Result<String, FeedError> {
        tracing::debug!(%url, "fetching upstream feed");

        let res = self.http.get(url).send().await.map_err(|source| {
            FeedError::Transport { url: url.to_string(), source }
        })?;

        let status = res.status();
        if !status.is_success() {
            return Err(FeedError::Status { url: url.to_string(), status });
        }

        res.text().await.map_err(|source| {
            FeedError::Transport { url: url.to_string(), source }
        })
    }
}

/// Owns the endpoint base paths and per-feed URL templates, and performs
/// one bounded request per call. No retries.
#[derive(Debug)]
pub struct FeedClient {
    transport: Box<dyn Transport>,
    pda_base: String,
    web_base: String,
}

impl FeedClient {
    pub fn new(config: &Config) -> Result<Self> {
        let transport = HttpTransport::new(Duration::from_secs(config.timeout_secs))
            .context("Failed to build HTTP client")?;

        Ok(Self::with_transport(Box::new(transport), config))
    }

    pub fn with_transport(transport: Box<dyn Transport>, config: &Config) -> Self {
        Self {
            transport,
            pda_base: config.pda_base_url.clone(),
            web_base: config.web_base_url.clone(),
        }
    }

    pub fn local_weather_url(&self, grid_id: &str) -> String {
        format!("{}locspc/android_data/gridData/{grid_id}_tc.xml", self.pda_base)
    }

    /// The rainfall feed is keyed by the grid point's exact coordinates.
    /// Debug formatting keeps the trailing `.0` the upstream path expects
    /// for whole-number coordinates.
    pub fn rainfall_nowcast_url(&self, lat: f64, lng: f64) -> String {
        format!("{}locspc/android_data/rainfallnowcast/{lat:?}_{lng:?}.xml", self.pda_base)
    }

    pub fn uv_index_url(&self, lang: Lang) -> String {
        let file = match lang {
            Lang::TraditionalChinese => "fuvc.xml",
            Lang::English => "fuve.xml",
        };
        format!("{}locspc/android_data/{file}", self.pda_base)
    }

    pub fn weather_warning_url(&self, lang: Lang) -> String {
        let file = match lang {
            Lang::TraditionalChinese => "warnsumc.xml",
            Lang::English => "warnsum.xml",
        };
        format!("{}wxinfo/json/{file}", self.web_base)
    }

    pub fn forecast_url(&self, lang: Lang) -> String {
        let file = match lang {
            Lang::TraditionalChinese => "fnd_uc.xml",
            Lang::English => "fnd_e.xml",
        };
        format!("{}locspc/android_data/{file}", self.pda_base)
    }

    pub async fn get_text(&self, url: &str) -> Result<String, FeedError> {
        self.transport.get_text(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> FeedClient {
        FeedClient::new(&Config::default()).unwrap()
    }

    #[test]
    fn local_weather_url_substitutes_grid_id() {
        assert_eq!(
            client().local_weather_url("1012"),
            "http://pda.weather.gov.hk/locspc/android_data/gridData/1012_tc.xml"
        );
    }

    #[test]
    fn rainfall_url_keeps_whole_number_coordinates_as_floats() {
        assert_eq!(
            client().rainfall_nowcast_url(22.3, 114.0),
            "http://pda.weather.gov.hk/locspc/android_data/rainfallnowcast/22.3_114.0.xml"
        );
    }

    #[test]
    fn uv_url_varies_by_language() {
        let client = client();
        assert!(client.uv_index_url(Lang::TraditionalChinese).ends_with("fuvc.xml"));
        assert!(client.uv_index_url(Lang::English).ends_with("fuve.xml"));
    }

    #[test]
    fn warning_url_uses_the_web_host() {
        let client = client();
        assert_eq!(
            client.weather_warning_url(Lang::English),
            "http://www.weather.gov.hk/wxinfo/json/warnsum.xml"
        );
        assert_eq!(
            client.weather_warning_url(Lang::TraditionalChinese),
            "http://www.weather.gov.hk/wxinfo/json/warnsumc.xml"
        );
    }

    #[test]
    fn forecast_url_varies_by_language() {
        let client = client();
        assert!(client.forecast_url(Lang::TraditionalChinese).ends_with("fnd_uc.xml"));
        assert!(client.forecast_url(Lang::English).ends_with("fnd_e.xml"));
    }
}
