use std::ops::Deref;

use tracing::debug;

use crate::{
    config::ClientConfig,
    error::Result,
    model::{QueryParams, Units, WeatherReport},
    normalize::normalize,
    transport::{AsyncFetchJson, AsyncHttpClient, SessionResource},
};

use super::{city_params, coords_params};

/// Async OpenWeather client.
///
/// Requests are only valid while a session is open. The usual way is [`session`],
/// which returns a guard that closes the transport when it goes out of scope:
///
/// ```no_run
/// # use connectify_core::{AsyncOpenWeather, ClientConfig, Units};
/// # async fn run() -> connectify_core::Result<()> {
/// let mut client = AsyncOpenWeather::new(ClientConfig::new("KEY")?);
/// let session = client.session()?;
/// let report = session.get_city_weather("Algiers", Units::Metric, "en").await?;
/// println!("{:?}", report.temperature);
/// # Ok(())
/// # }
/// ```
///
/// [`session`]: AsyncOpenWeather::session
#[derive(Debug)]
pub struct AsyncOpenWeather<T = AsyncHttpClient> {
    config: ClientConfig,
    transport: T,
}

impl AsyncOpenWeather<AsyncHttpClient> {
    pub fn new(config: ClientConfig) -> Self {
        let transport = AsyncHttpClient::new(config.timeout(), config.retry_policy());
        Self::with_transport(config, transport)
    }

    /// Client configured from `CONNECTIFY_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(ClientConfig::resolve(None)?))
    }
}

impl<T> AsyncOpenWeather<T>
where
    T: AsyncFetchJson + SessionResource,
{
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Open the transport and return a guard that closes it on drop.
    pub fn session(&mut self) -> Result<Session<'_, T>> {
        self.transport.open()?;
        debug!("weather session started");
        Ok(Session { client: self })
    }

    /// Manual lifecycle; prefer [`session`](Self::session).
    pub fn open(&mut self) -> Result<()> {
        self.transport.open()
    }

    pub fn close(&mut self) {
        self.transport.close();
    }

    pub fn is_open(&self) -> bool {
        self.transport.is_open()
    }

    /// Current weather for a city name, e.g. `"Algiers"` or `"London,uk"`.
    pub async fn get_city_weather(&self, city: &str, units: Units, lang: &str) -> Result<WeatherReport> {
        let params = city_params(city, units, lang, self.config.api_key())?;
        self.fetch(&params).await
    }

    pub async fn get_by_coords(
        &self,
        lat: f64,
        lon: f64,
        units: Units,
        lang: &str,
    ) -> Result<WeatherReport> {
        let params = coords_params(lat, lon, units, lang, self.config.api_key())?;
        self.fetch(&params).await
    }

    async fn fetch(&self, params: &QueryParams) -> Result<WeatherReport> {
        let raw = self.transport.fetch_json(self.config.base_url(), params).await?;
        Ok(normalize(raw))
    }
}

/// Open session on an [`AsyncOpenWeather`]; derefs to the client.
///
/// Dropping the guard closes the transport, whichever way the scope is left.
pub struct Session<'a, T: SessionResource> {
    client: &'a mut AsyncOpenWeather<T>,
}

impl<T: SessionResource> Deref for Session<'_, T> {
    type Target = AsyncOpenWeather<T>;

    fn deref(&self) -> &Self::Target {
        self.client
    }
}

impl<T: SessionResource> Drop for Session<'_, T> {
    fn drop(&mut self) {
        self.client.transport.close();
        debug!("weather session ended");
    }
}
