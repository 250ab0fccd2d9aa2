use serde::Serialize;

use crate::error::CoordinateError;

/// A validated latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

impl Coordinate {
    /// Range-check a parsed pair, latitude first.
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoordinateError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::LatitudeOutOfRange);
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(CoordinateError::LongitudeOutOfRange);
        }

        Ok(Self { lat, lon })
    }

    /// Build a coordinate from raw query values.
    ///
    /// Absent and empty values both count as missing. Both values are parsed
    /// before either is range-checked, so a bad longitude format wins over an
    /// out-of-range latitude.
    pub fn parse(lat: Option<&str>, lon: Option<&str>) -> Result<Self, CoordinateError> {
        let (lat, lon) = match (lat, lon) {
            (Some(lat), Some(lon)) if !lat.is_empty() && !lon.is_empty() => (lat, lon),
            _ => return Err(CoordinateError::Missing),
        };

        let lat = parse_degrees(lat).ok_or(CoordinateError::InvalidLatitude)?;
        let lon = parse_degrees(lon).ok_or(CoordinateError::InvalidLongitude)?;

        Self::new(lat, lon)
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}

/// Parse a decimal degree value.
///
/// A literal that overflows `f64` is a format error; spelled-out infinities
/// and NaN parse and are left for the range check to reject.
fn parse_degrees(raw: &str) -> Option<f64> {
    let value: f64 = raw.parse().ok()?;
    if value.is_infinite() && !raw.to_ascii_lowercase().contains("inf") {
        return None;
    }
    Some(value)
}

/// Renders as `"<lat>, <lon>"` with four decimals each.
impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lon)
    }
}

/// The first forecast period as reported upstream, unit untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastResult {
    pub short_forecast: String,
    pub temperature: i32,
    pub temperature_unit: String,
}

impl ForecastResult {
    pub fn fahrenheit(&self) -> i32 {
        to_fahrenheit(self.temperature, &self.temperature_unit)
    }
}

/// A forecast normalised to Fahrenheit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedForecast {
    pub short_forecast: String,
    pub temperature_f: i32,
}

/// Convert a reported temperature to whole degrees Fahrenheit.
///
/// Only a case-insensitive `"C"` triggers conversion; the result truncates
/// toward zero. Any other unit, recognised or not, passes through unchanged.
pub fn to_fahrenheit(value: i32, unit: &str) -> i32 {
    if unit.eq_ignore_ascii_case("C") {
        (f64::from(value) * 9.0 / 5.0 + 32.0) as i32
    } else {
        value
    }
}

/// Coarse temperature classification used in responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureBucket {
    Hot,
    Cold,
    Moderate,
}

impl TemperatureBucket {
    pub fn classify(temp_f: i32) -> Self {
        match temp_f {
            t if t >= 80 => Self::Hot,
            t if t <= 40 => Self::Cold,
            _ => Self::Moderate,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hot => "hot",
            Self::Cold => "cold",
            Self::Moderate => "moderate",
        }
    }
}

impl std::fmt::Display for TemperatureBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of every `/weather` response.
///
/// Either the three forecast fields or `error` are set, never both; unset
/// fields are left out of the JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeatherResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<TemperatureBucket>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WeatherResponse {
    pub fn success(forecast: &ResolvedForecast, coordinate: &Coordinate) -> Self {
        Self {
            forecast: Some(forecast.short_forecast.clone()),
            temperature: Some(TemperatureBucket::classify(forecast.temperature_f)),
            coordinates: Some(coordinate.to_string()),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            forecast: None,
            temperature: None,
            coordinates: None,
            error: Some(message.into()),
        }
    }
}
