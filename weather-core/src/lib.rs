//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client (geocode + 5-day forecast)
//! - Projection of the forecast series into a current reading and daily samples
//! - The city query pipeline tying those together
//! - The persisted search history
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod forecast;
pub mod history;
pub mod model;
pub mod pipeline;
pub mod provider;

pub use config::Config;
pub use error::WeatherError;
pub use history::HistoryStore;
pub use model::{City, Coordinate, CurrentWeather, ForecastDay, WeatherReport};
pub use pipeline::{WeatherService, city_name_from_body, validate_city_name};
pub use provider::{WeatherProvider, provider_from_config};
