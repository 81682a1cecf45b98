//! Core library for the `connectify` CLI.
//!
//! This crate defines:
//! - Configuration resolution (explicit values, `CONNECTIFY_*` env vars, settings file)
//! - Blocking and async transports with retry and exponential backoff
//! - Normalization of OpenWeather payloads into [`WeatherReport`]
//! - The [`OpenWeather`] and [`AsyncOpenWeather`] clients tying these together
//!
//! Every failure is reported as a [`ConnectifyError`].

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod retry;
pub mod transport;

pub use client::{AsyncOpenWeather, OpenWeather, Session};
pub use config::{API_KEY_ENV, ClientConfig, Settings};
pub use error::{ConnectifyError, Result};
pub use model::{DEFAULT_LANG, QueryParams, Units, WeatherReport};
pub use normalize::normalize;
pub use retry::RetryPolicy;
pub use transport::{AsyncFetchJson, AsyncHttpClient, FetchJson, HttpTransport, SessionResource};
