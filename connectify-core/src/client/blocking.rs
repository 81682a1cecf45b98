use crate::{
    config::ClientConfig,
    error::Result,
    model::{QueryParams, Units, WeatherReport},
    normalize::normalize,
    transport::{FetchJson, HttpTransport},
};

use super::{city_params, coords_params};

/// Blocking OpenWeather client.
///
/// Holds only its configuration and transport, so each thread can own one or share a
/// reference.
#[derive(Debug, Clone)]
pub struct OpenWeather<T = HttpTransport> {
    config: ClientConfig,
    transport: T,
}

impl OpenWeather<HttpTransport> {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.timeout(), config.retry_policy())?;
        Ok(Self::with_transport(config, transport))
    }

    /// Client configured from `CONNECTIFY_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::resolve(None)?)
    }
}

impl<T: FetchJson> OpenWeather<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Current weather for a city name, e.g. `"Algiers"` or `"London,uk"`.
    pub fn get_city_weather(&self, city: &str, units: Units, lang: &str) -> Result<WeatherReport> {
        let params = city_params(city, units, lang, self.config.api_key())?;
        self.fetch(&params)
    }

    pub fn get_by_coords(&self, lat: f64, lon: f64, units: Units, lang: &str) -> Result<WeatherReport> {
        let params = coords_params(lat, lon, units, lang, self.config.api_key())?;
        self.fetch(&params)
    }

    fn fetch(&self, params: &QueryParams) -> Result<WeatherReport> {
        let raw = self.transport.fetch_json(self.config.base_url(), params)?;
        Ok(normalize(raw))
    }
}
