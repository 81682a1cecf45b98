use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use connectify_core::{
    AsyncOpenWeather, ClientConfig, ConnectifyError, DEFAULT_LANG, OpenWeather, Settings, Units,
    WeatherReport,
};
use inquire::{Password, PasswordDisplayMode, Select, Text};
use tracing::warn;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "connectify", version, about = "Connectify CLI (OpenWeather)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Current weather for a city (blocking client).
    Weather {
        /// City name, e.g. "Algiers" or "London,uk".
        city: String,

        #[command(flatten)]
        opts: QueryOpts,
    },

    /// Current weather for a city (async client).
    Aweather {
        /// City name, e.g. "Algiers" or "London,uk".
        city: String,

        #[command(flatten)]
        opts: QueryOpts,
    },

    /// Current weather at a coordinate pair.
    Coords {
        #[arg(allow_negative_numbers = true)]
        lat: f64,

        #[arg(allow_negative_numbers = true)]
        lon: f64,

        #[command(flatten)]
        opts: QueryOpts,
    },

    /// Store the API key and default units/language in the settings file.
    Configure,
}

#[derive(Debug, Args)]
pub struct QueryOpts {
    /// metric, imperial or standard (default: settings file, else metric).
    #[arg(long)]
    units: Option<Units>,

    /// Language code for the description (default: settings file, else "en").
    #[arg(long)]
    lang: Option<String>,

    /// API key; overrides CONNECTIFY_OPENWEATHER_API_KEY and the settings file.
    #[arg(long)]
    apikey: Option<String>,

    /// Print the full normalized report as JSON.
    #[arg(long)]
    json: bool,
}

/// Fully resolved options for one lookup.
struct Query {
    config: ClientConfig,
    units: Units,
    lang: String,
    json: bool,
}

impl QueryOpts {
    fn resolve(self, settings: &Settings) -> anyhow::Result<Query> {
        let config = ClientConfig::resolve_with_settings(self.apikey.as_deref(), settings)?;
        Ok(Query {
            config,
            units: self.units.or(settings.units).unwrap_or_default(),
            lang: self
                .lang
                .or_else(|| settings.lang.clone())
                .unwrap_or_else(|| DEFAULT_LANG.to_string()),
            json: self.json,
        })
    }
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Weather { city, opts } => {
                let q = opts.resolve(&load_settings())?;
                let report = OpenWeather::new(q.config)?.get_city_weather(&city, q.units, &q.lang)?;
                print_report(&report, q.units, q.json)
            }
            Command::Aweather { city, opts } => {
                let Query { config, units, lang, json } = opts.resolve(&load_settings())?;
                let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
                let report = runtime.block_on(async move {
                    let mut client = AsyncOpenWeather::new(config);
                    let session = client.session()?;
                    let report = session.get_city_weather(&city, units, &lang).await?;
                    Ok::<_, ConnectifyError>(report)
                })?;
                print_report(&report, units, json)
            }
            Command::Coords { lat, lon, opts } => {
                let q = opts.resolve(&load_settings())?;
                let report = OpenWeather::new(q.config)?.get_by_coords(lat, lon, q.units, &q.lang)?;
                print_report(&report, q.units, q.json)
            }
            Command::Configure => configure(),
        }
    }
}

/// A broken settings file shouldn't block lookups that pass everything explicitly.
fn load_settings() -> Settings {
    Settings::load().unwrap_or_else(|err| {
        warn!("ignoring settings file: {err:#}");
        Settings::default()
    })
}

fn print_report(report: &WeatherReport, units: Units, json: bool) -> anyhow::Result<()> {
    if json {
        let text = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
        println!("{text}");
    } else {
        println!("{}", summary_line(report, units));
    }
    Ok(())
}

fn summary_line(report: &WeatherReport, units: Units) -> String {
    let city = report.city.as_deref().unwrap_or("Unknown");
    let country = report.country.as_deref().unwrap_or("");
    let temp = report.temperature.map_or_else(|| "?".to_string(), |t| t.to_string());
    let desc = report.description.as_deref().unwrap_or("");
    format!("{city}, {country} — {temp}{} — {desc}", units.temperature_symbol())
}

fn configure() -> anyhow::Result<()> {
    let mut settings = Settings::load()?;

    let api_key = Password::new("OpenWeather API key (leave empty to keep current):")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")?;
    let api_key = api_key.trim();
    if !api_key.is_empty() {
        settings.api_key = Some(api_key.to_string());
    }

    let current = settings.units.unwrap_or_default();
    let cursor = Units::all().iter().position(|u| *u == current).unwrap_or(0);
    let units = Select::new("Default units:", Units::all().to_vec())
        .with_starting_cursor(cursor)
        .prompt()
        .context("Failed to read units")?;
    settings.units = Some(units);

    let lang = Text::new("Default language code:")
        .with_default(settings.lang.as_deref().unwrap_or(DEFAULT_LANG))
        .prompt()
        .context("Failed to read language")?;
    settings.lang = Some(lang.trim().to_string());

    let path = settings.save()?;
    println!("Settings saved to {}", path.display());

    Ok(())
}
