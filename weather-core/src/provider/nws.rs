use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{
    Client, StatusCode,
    header::{ACCEPT, HeaderMap, HeaderValue},
};
use serde::Deserialize;
use tracing::{debug, info};

use crate::{
    config::UpstreamConfig,
    error::{ResolveError, Stage},
    model::{Coordinate, ForecastResult},
};

use super::ForecastSource;

/// Client for the two-step api.weather.gov lookup: points, then forecast.
#[derive(Debug, Clone)]
pub struct NwsClient {
    base_url: String,
    http: Client,
}

impl NwsClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/geo+json"));

        let http = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .context("Failed to build HTTP client for api.weather.gov")?;

        Ok(Self::with_client(&config.base_url, http))
    }

    pub fn with_client(base_url: &str, http: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    pub fn points_url(&self, coordinate: &Coordinate) -> String {
        format!(
            "{}/points/{:.4},{:.4}",
            self.base_url,
            coordinate.lat(),
            coordinate.lon()
        )
    }

    /// Look up the grid point and return its forecast URL.
    async fn fetch_forecast_url(&self, coordinate: &Coordinate) -> Result<String, ResolveError> {
        let url = self.points_url(coordinate);
        debug!(%url, "Calling NWS grid points API");

        let res = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| ResolveError::UpstreamUnreachable {
                stage: Stage::Points,
                source,
            })?;

        let status = res.status();
        info!(%status, "Grid points API responded");

        if status == StatusCode::NOT_FOUND {
            return Err(ResolveError::GridNotFound {
                lat: coordinate.lat(),
                lon: coordinate.lon(),
            });
        }
        if status != StatusCode::OK {
            return Err(ResolveError::UpstreamError(status));
        }

        let body = res
            .text()
            .await
            .map_err(|source| ResolveError::UpstreamUnreachable {
                stage: Stage::Points,
                source,
            })?;

        let parsed: NwsPointsResponse =
            serde_json::from_str(&body).map_err(|e| ResolveError::malformed(Stage::Points, e))?;

        match parsed.properties.forecast {
            Some(forecast) if !forecast.is_empty() => {
                debug!(url = %forecast, "Forecast URL");
                Ok(forecast)
            }
            _ => Err(ResolveError::malformed(
                Stage::Points,
                "no forecast URL found in grid response",
            )),
        }
    }

    async fn fetch_first_period(&self, url: &str) -> Result<ForecastResult, ResolveError> {
        let res = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| ResolveError::UpstreamUnreachable {
                stage: Stage::Forecast,
                source,
            })?;

        let status = res.status();
        info!(%status, "Forecast API responded");

        if status != StatusCode::OK {
            return Err(ResolveError::ForecastUnavailable(status));
        }

        let body = res
            .text()
            .await
            .map_err(|source| ResolveError::UpstreamUnreachable {
                stage: Stage::Forecast,
                source,
            })?;

        let parsed: NwsForecastResponse = serde_json::from_str(&body)
            .map_err(|e| ResolveError::malformed(Stage::Forecast, e))?;

        let period = parsed
            .properties
            .periods
            .into_iter()
            .next()
            .ok_or(ResolveError::NoForecastPeriods)?;

        Ok(ForecastResult {
            short_forecast: period.short_forecast,
            temperature: period.temperature,
            temperature_unit: period.temperature_unit,
        })
    }
}

#[async_trait]
impl ForecastSource for NwsClient {
    async fn first_period(&self, coordinate: &Coordinate) -> Result<ForecastResult, ResolveError> {
        let forecast_url = self.fetch_forecast_url(coordinate).await?;
        self.fetch_first_period(&forecast_url).await
    }
}

#[derive(Debug, Default, Deserialize)]
struct NwsPointsProperties {
    forecast: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NwsPointsResponse {
    #[serde(default)]
    properties: NwsPointsProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NwsPeriod {
    short_forecast: String,
    temperature: i32,
    #[serde(default)]
    temperature_unit: String,
}

#[derive(Debug, Default, Deserialize)]
struct NwsForecastProperties {
    #[serde(default)]
    periods: Vec<NwsPeriod>,
}

#[derive(Debug, Deserialize)]
struct NwsForecastResponse {
    #[serde(default)]
    properties: NwsForecastProperties,
}
