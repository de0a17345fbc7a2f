use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, Text, validator::Validation};
use weather_core::{
    Config, HistoryStore, WeatherService, config::DEFAULT_BASE_URL, provider_from_config,
};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the provider base URL and API key.
    Configure,

    /// Show current weather and a 5-day forecast for a city.
    Search {
        /// City name, e.g. "Boston".
        city: String,

        /// Print the raw `{ currentWeather, forecast }` payload.
        #[arg(long)]
        json: bool,
    },

    /// Inspect or edit previously searched cities.
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum HistoryAction {
    /// List searched cities in the order they were added.
    List {
        #[arg(long)]
        json: bool,
    },

    /// Delete a history entry by id. Unknown ids are ignored.
    Delete { id: String },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Search { city, json } => search(&city, json).await,
            Command::History { action } => history(action).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let base_url = Text::new("Provider base URL:")
        .with_default(cfg.api_base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))
        .prompt()
        .context("Base URL prompt was cancelled")?;

    let api_key = Password::new("API key:")
        .without_confirmation()
        .with_validator(|key: &str| {
            Ok(if key.trim().is_empty() {
                Validation::Invalid("API key must not be empty".into())
            } else {
                Validation::Valid
            })
        })
        .prompt()
        .context("API key prompt was cancelled")?;

    cfg.set_credentials(base_url.trim().to_string(), api_key.trim().to_string());
    cfg.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn search(city: &str, json: bool) -> anyhow::Result<()> {
    let cfg = Config::load_with_env()?;
    let service = WeatherService::new(provider_from_config(&cfg));

    let report = service.get_forecast_for_city(city).await.inspect_err(|e| {
        tracing::error!(kind = e.kind(), error = %e, "weather lookup failed");
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        output::print_report(&report);
    }

    // The report is already out; a history failure must not turn this into an error.
    if let Err(e) = record_search(&cfg, city).await {
        tracing::warn!(error = %e, "could not record city in history");
    }

    Ok(())
}

async fn record_search(cfg: &Config, city: &str) -> anyhow::Result<()> {
    let store = HistoryStore::open(cfg.history_path()?).await?;
    store.add(city.trim()).await?;
    Ok(())
}

async fn history(action: HistoryAction) -> anyhow::Result<()> {
    let cfg = Config::load_with_env()?;
    let store = HistoryStore::open(cfg.history_path()?).await?;

    match action {
        HistoryAction::List { json } => {
            let cities = store.list().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&cities)?);
            } else {
                output::print_history(&cities);
            }
        }
        HistoryAction::Delete { id } => {
            store.remove(&id).await?;
            println!("City removed");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_search_with_json_flag() {
        let cli = Cli::try_parse_from(["weather", "search", "New York", "--json"]).unwrap();
        match cli.command {
            Command::Search { city, json } => {
                assert_eq!(city, "New York");
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[tokio::test]
    async fn record_search_appends_trimmed_city() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config {
            history_file: Some(dir.path().join("history.json")),
            ..Config::default()
        };

        record_search(&cfg, "  Paris ").await.unwrap();

        let store = HistoryStore::new(dir.path().join("history.json"));
        let names: Vec<String> = store.list().await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Paris"]);
    }

    #[tokio::test]
    async fn record_search_reports_unusable_history_location() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let cfg = Config {
            history_file: Some(blocker.join("history.json")),
            ..Config::default()
        };

        assert!(record_search(&cfg, "Paris").await.is_err());
    }

    #[test]
    fn parses_history_delete() {
        let cli = Cli::try_parse_from(["weather", "history", "delete", "3"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::History { action: HistoryAction::Delete { ref id } } if id == "3"
        ));
    }
}
