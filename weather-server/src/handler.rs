//! HTTP request handlers.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::{error, info, instrument, warn};
use weather_core::{Coordinate, CoordinateError, ResolveError, WeatherResponse, provider};

use crate::server::AppState;

/// Shown to clients for every upstream failure; the cause only goes to the log.
pub const GENERIC_FAILURE: &str = "Failed to retrieve weather data";

const INDEX_HTML: &str = include_str!("index.html");

/// Query pairs in request order; a repeated key keeps its first value.
#[derive(Debug, Default)]
pub struct WeatherParams {
    lat: Option<String>,
    lon: Option<String>,
}

impl WeatherParams {
    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "lat" => &mut params.lat,
                "lon" => &mut params.lon,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }
}

#[derive(Debug)]
pub enum ApiError {
    Input(CoordinateError),
    Resolve(ResolveError),
}

impl From<CoordinateError> for ApiError {
    fn from(err: CoordinateError) -> Self {
        Self::Input(err)
    }
}

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        Self::Resolve(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Input(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Self::Resolve(err) if err.is_client_error() => {
                warn!(error = %err, "Error getting weather data");
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            Self::Resolve(err) => {
                error!(error = %err, "Error getting weather data");
                (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE.to_string())
            }
        };

        (status, Json(WeatherResponse::error(message))).into_response()
    }
}

#[instrument(skip(state, pairs))]
pub async fn weather(
    State(state): State<AppState>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<WeatherResponse>, ApiError> {
    // An undecodable query string has no usable lat/lon either.
    let Query(pairs) = pairs.map_err(|_| CoordinateError::Missing)?;
    let params = WeatherParams::from_pairs(pairs);

    let coordinate = Coordinate::parse(params.lat.as_deref(), params.lon.as_deref())?;
    let forecast = provider::resolve(state.source.as_ref(), &coordinate).await?;

    let response = WeatherResponse::success(&forecast, &coordinate);
    info!(%coordinate, temperature = ?response.temperature, "Served weather");

    Ok(Json(response))
}

pub async fn health() -> &'static str {
    "Weather service is running"
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
