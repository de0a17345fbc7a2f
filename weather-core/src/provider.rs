use crate::{Config, error::Result, model::Coordinate, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;
pub mod payload;

pub use payload::{RawCondition, RawEntry, RawForecast, RawMain, RawWind};

/// The two outbound calls a city query needs.
///
/// Implementations make exactly one attempt per call; retries are the caller's business.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Geocode a free-text city name and keep the first candidate.
    async fn resolve_coordinate(&self, city_name: &str) -> Result<Coordinate>;

    /// Fetch the 3-hour forecast series for a coordinate, undecoded beyond JSON shape.
    async fn fetch_forecast(&self, coordinate: &Coordinate) -> Result<RawForecast>;
}

/// Construct the provider from config. Missing credentials are reported on first use.
pub fn provider_from_config(config: &Config) -> Box<dyn WeatherProvider> {
    Box::new(OpenWeatherProvider::new(config.api_base_url.clone(), config.api_key.clone()))
}
