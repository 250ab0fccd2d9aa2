use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{CustomType, Text};
use std::path::PathBuf;
use weather_core::{Config, Coordinate, TemperatureBucket, provider};

use crate::server;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "US weather summaries from api.weather.gov")]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP service.
    Serve {
        /// Address to bind, overrides `server.host`.
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on, overrides `server.port`.
        #[arg(long)]
        port: Option<u16>,
    },

    /// Show the current forecast for a coordinate.
    Show {
        /// Latitude in decimal degrees.
        #[arg(allow_hyphen_values = true)]
        lat: String,

        /// Longitude in decimal degrees, negative for west.
        #[arg(allow_hyphen_values = true)]
        lon: String,
    },

    /// Interactively edit the config file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = self.load_config()?;

        match self.command {
            Command::Serve { host, port } => {
                if let Some(host) = host {
                    config.server.host = host;
                }
                if let Some(port) = port {
                    config.server.port = port;
                }
                server::serve(&config).await
            }
            Command::Show { lat, lon } => show(&config, &lat, &lon).await,
            Command::Configure => configure(config, self.config),
        }
    }

    fn load_config(&self) -> anyhow::Result<Config> {
        match &self.config {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        }
    }
}

async fn show(config: &Config, lat: &str, lon: &str) -> anyhow::Result<()> {
    let coordinate = Coordinate::parse(Some(lat), Some(lon))?;
    let source = provider::source_from_config(&config.upstream)?;

    let forecast = provider::resolve(source.as_ref(), &coordinate)
        .await
        .context("Failed to retrieve weather data")?;

    let bucket = TemperatureBucket::classify(forecast.temperature_f);

    println!("Coordinates: {coordinate}");
    println!("Forecast:    {}", forecast.short_forecast);
    println!("Temperature: {bucket} ({}°F)", forecast.temperature_f);

    Ok(())
}

fn configure(mut config: Config, path: Option<PathBuf>) -> anyhow::Result<()> {
    config.server.port = CustomType::<u16>::new("Listening port:")
        .with_default(config.server.port)
        .with_error_message("Please enter a port between 0 and 65535")
        .prompt()?;

    config.upstream.base_url = Text::new("NWS API base URL:")
        .with_default(&config.upstream.base_url)
        .prompt()?;

    config.upstream.timeout_secs = CustomType::<u64>::new("Upstream timeout (seconds):")
        .with_default(config.upstream.timeout_secs)
        .with_error_message("Please enter a whole number of seconds")
        .prompt()?;

    config.upstream.user_agent = Text::new("User-Agent sent to api.weather.gov:")
        .with_default(&config.upstream.user_agent)
        .with_help_message("NWS asks for an app name and contact, e.g. \"myapp (me@example.com)\"")
        .prompt()?;

    config.validate()?;

    let saved_to = match path {
        Some(path) => {
            config.save_to(&path)?;
            path
        }
        None => config.save()?,
    };

    println!("Configuration saved to {}", saved_to.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_accepts_negative_longitude() {
        let cli = Cli::try_parse_from(["weather", "show", "40.7128", "-74.0060"]).unwrap();
        match cli.command {
            Command::Show { lat, lon } => {
                assert_eq!(lat, "40.7128");
                assert_eq!(lon, "-74.0060");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn serve_overrides_are_optional() {
        let cli = Cli::try_parse_from(["weather", "serve"]).unwrap();
        assert!(matches!(cli.command, Command::Serve { host: None, port: None }));

        let cli =
            Cli::try_parse_from(["weather", "--config", "/tmp/w.toml", "serve", "--port", "9000"])
                .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/w.toml")));
        assert!(matches!(cli.command, Command::Serve { port: Some(9000), .. }));
    }

    #[tokio::test]
    async fn show_rejects_bad_input_before_any_lookup() {
        let err = show(&Config::default(), "abc", "-74").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid latitude format");

        let err = show(&Config::default(), "91", "0").await.unwrap_err();
        assert_eq!(err.to_string(), "Latitude must be between -90 and 90");
    }
}
