use async_trait::async_trait;
use std::fmt::Debug;
use tracing::{info, warn};

use crate::{
    config::UpstreamConfig,
    coverage,
    error::ResolveError,
    model::{Coordinate, ForecastResult, ResolvedForecast},
    provider::nws::NwsClient,
};

pub mod nws;

/// Something that can produce the current forecast period for a covered point.
#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    async fn first_period(&self, coordinate: &Coordinate) -> Result<ForecastResult, ResolveError>;
}

/// Construct the api.weather.gov source from config.
pub fn source_from_config(config: &UpstreamConfig) -> anyhow::Result<Box<dyn ForecastSource>> {
    Ok(Box::new(NwsClient::new(config)?))
}

/// Resolve a coordinate into a Fahrenheit forecast.
///
/// Points outside coverage are rejected before `source` is consulted.
pub async fn resolve(
    source: &dyn ForecastSource,
    coordinate: &Coordinate,
) -> Result<ResolvedForecast, ResolveError> {
    let Some(region) = coverage::covering_region(coordinate.lat(), coordinate.lon()) else {
        return Err(ResolveError::OutOfCoverage {
            lat: coordinate.lat(),
            lon: coordinate.lon(),
        });
    };

    info!(%coordinate, %region, "Fetching weather");

    let period = source.first_period(coordinate).await?;

    info!(
        forecast = %period.short_forecast,
        temperature = period.temperature,
        unit = %period.temperature_unit,
        "Retrieved forecast"
    );

    let temperature_f = period.fahrenheit();
    if period.temperature_unit.eq_ignore_ascii_case("C") {
        info!(celsius = period.temperature, fahrenheit = temperature_f, "Converted temperature");
    } else if !period.temperature_unit.eq_ignore_ascii_case("F") {
        warn!(
            unit = %period.temperature_unit,
            "Unrecognised temperature unit, assuming Fahrenheit"
        );
    }

    Ok(ResolvedForecast {
        short_forecast: period.short_forecast,
        temperature_f,
    })
}
