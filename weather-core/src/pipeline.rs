use serde_json::Value;

use crate::{
    error::{Result, WeatherError},
    forecast::{project_current, project_forecast},
    model::WeatherReport,
    provider::WeatherProvider,
};

const INVALID_CITY: &str = "A valid city name must be provided.";

/// Resolves a city name to a report: geocode, then forecast, then projection.
///
/// Each step needs the previous one's output, so nothing runs concurrently and
/// any failure aborts the whole query.
#[derive(Debug)]
pub struct WeatherService {
    provider: Box<dyn WeatherProvider>,
}

impl WeatherService {
    pub fn new(provider: Box<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    pub async fn get_forecast_for_city(&self, city_name: &str) -> Result<WeatherReport> {
        let city = validate_city_name(city_name)?;
        tracing::info!(city, "looking up weather");

        let coordinate = self.provider.resolve_coordinate(city).await?;
        let payload = self.provider.fetch_forecast(&coordinate).await?;

        let current_weather = project_current(city, &payload)?;
        let forecast = project_forecast(payload.list.as_deref().unwrap_or_default())?;

        Ok(WeatherReport { current_weather, forecast })
    }
}

/// Trimmed city name, or `InvalidInput` when nothing is left.
pub fn validate_city_name(raw: &str) -> Result<&str> {
    let city = raw.trim();
    if city.is_empty() {
        tracing::warn!("rejected empty city name");
        return Err(WeatherError::InvalidInput(INVALID_CITY.into()));
    }
    Ok(city)
}

/// Pull `cityName` out of a JSON request body. Absent, non-string and blank
/// values are all rejected.
pub fn city_name_from_body(body: &Value) -> Result<String> {
    match body.get("cityName") {
        Some(Value::String(name)) => validate_city_name(name).map(str::to_string),
        other => {
            tracing::warn!(value = ?other, "rejected non-string city name");
            Err(WeatherError::InvalidInput(INVALID_CITY.into()))
        }
    }
}
