use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConnectifyError;

pub const DEFAULT_LANG: &str = "en";

/// Query string sent to the provider, in insertion order.
pub type QueryParams = Vec<(&'static str, String)>;

/// Unit system requested from OpenWeather.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
    Standard,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
            Units::Standard => "standard",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Metric, Units::Imperial, Units::Standard]
    }

    /// Suffix used when printing a temperature in this unit system.
    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
            Units::Standard => "K",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = ConnectifyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            "standard" => Ok(Units::Standard),
            _ => Err(ConnectifyError::new(format!(
                "unknown units '{value}'. Supported units: metric, imperial, standard"
            ))),
        }
    }
}

impl FromStr for Units {
    type Err = ConnectifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Units::try_from(s)
    }
}

/// Flattened view of an OpenWeather current-weather payload.
///
/// Every extracted field is optional; `raw` keeps the full payload for
/// callers that need anything not mapped here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub city: Option<String>,
    pub country: Option<String>,
    pub temperature: Option<f64>,
    pub feels_like: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub pressure: Option<f64>,
    pub humidity: Option<f64>,
    pub description: Option<String>,
    pub wind_speed: Option<f64>,
    pub raw: Value,
}
