//! Core library for the `weather` service.
//!
//! This crate defines:
//! - Configuration handling
//! - The coordinate-to-forecast pipeline against api.weather.gov
//! - Coverage screening and temperature classification
//! - Shared domain models (coordinates, forecasts, wire responses)
//!
//! It is used by `weather-server`, but can also be reused by other binaries or services.

pub mod config;
pub mod coverage;
pub mod error;
pub mod model;
pub mod provider;

pub use config::{Config, ServerConfig, UpstreamConfig};
pub use error::{CoordinateError, ResolveError, Stage};
pub use model::{
    Coordinate, ForecastResult, ResolvedForecast, TemperatureBucket, WeatherResponse,
    to_fahrenheit,
};
pub use provider::{ForecastSource, nws::NwsClient, resolve, source_from_config};
