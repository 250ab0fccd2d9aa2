use reqwest::StatusCode;
use thiserror::Error;

/// Which of the two upstream calls an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Points,
    Forecast,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Points => "grid points",
            Stage::Forecast => "forecast",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected `lat`/`lon` input. The messages are shown to clients as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CoordinateError {
    #[error("Missing required parameters: lat and lon")]
    Missing,

    #[error("Invalid latitude format")]
    InvalidLatitude,

    #[error("Invalid longitude format")]
    InvalidLongitude,

    #[error("Latitude must be between -90 and 90")]
    LatitudeOutOfRange,

    #[error("Longitude must be between -180 and 180")]
    LongitudeOutOfRange,
}

/// Failure to turn a coordinate into a forecast.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(
        "coordinates ({lat:.4}, {lon:.4}) are outside NWS coverage area (US and territories only)"
    )]
    OutOfCoverage { lat: f64, lon: f64 },

    #[error(
        "coordinates ({lat:.4}, {lon:.4}) not found in NWS grid system - may be outside coverage area"
    )]
    GridNotFound { lat: f64, lon: f64 },

    #[error("failed to reach {stage} API: {source}")]
    UpstreamUnreachable {
        stage: Stage,
        #[source]
        source: reqwest::Error,
    },

    #[error("grid points API returned status: {0}")]
    UpstreamError(StatusCode),

    #[error("failed to parse {stage} response: {detail}")]
    MalformedUpstreamResponse { stage: Stage, detail: String },

    #[error("no forecast periods found")]
    NoForecastPeriods,

    #[error("forecast API returned status: {0}")]
    ForecastUnavailable(StatusCode),
}

impl ResolveError {
    /// Whether the failure is the caller's to fix, as opposed to an upstream problem.
    ///
    /// Client errors carry a message safe to show verbatim; everything else
    /// should be logged and reported generically.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::OutOfCoverage { .. } | Self::GridNotFound { .. })
    }

    pub(crate) fn malformed(stage: Stage, detail: impl std::fmt::Display) -> Self {
        Self::MalformedUpstreamResponse {
            stage,
            detail: detail.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coverage_messages_format_four_decimals() {
        let err = ResolveError::OutOfCoverage {
            lat: 51.5,
            lon: -0.12781,
        };
        assert_eq!(
            err.to_string(),
            "coordinates (51.5000, -0.1278) are outside NWS coverage area (US and territories only)"
        );

        let err = ResolveError::GridNotFound {
            lat: 40.0,
            lon: -74.0,
        };
        assert!(err.to_string().contains("not found in NWS grid system"));
    }

    #[test]
    fn only_coverage_and_grid_errors_are_client_errors() {
        assert!(ResolveError::OutOfCoverage { lat: 0.0, lon: 0.0 }.is_client_error());
        assert!(ResolveError::GridNotFound { lat: 0.0, lon: 0.0 }.is_client_error());
        assert!(!ResolveError::NoForecastPeriods.is_client_error());
        assert!(!ResolveError::UpstreamError(StatusCode::BAD_GATEWAY).is_client_error());
        assert!(!ResolveError::ForecastUnavailable(StatusCode::NOT_FOUND).is_client_error());
        assert!(!ResolveError::malformed(Stage::Points, "eof").is_client_error());
    }

    #[test]
    fn status_errors_name_the_status() {
        let err = ResolveError::UpstreamError(StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            err.to_string(),
            "grid points API returned status: 503 Service Unavailable"
        );
    }
}
