use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;

use crate::{
    config::{API_KEY_ENV, BASE_URL_ENV},
    error::{Result, WeatherError},
    model::Coordinate,
    provider::payload::RawForecast,
};

use super::WeatherProvider;

const GEOCODE_PATH: &str = "geo/1.0/direct";
const FORECAST_PATH: &str = "data/2.5/forecast";
const GEOCODE_LIMIT: &str = "5";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    base_url: Option<String>,
    api_key: Option<String>,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(base_url: Option<String>, api_key: Option<String>) -> Self {
        Self {
            base_url,
            api_key,
            http: Client::new(),
        }
    }

    /// Base URL without trailing slash, plus the key; both are required for every call.
    fn credentials(&self) -> Result<(&str, &str)> {
        let base = self
            .base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .filter(|url| !url.is_empty());
        let key = self.api_key.as_deref().filter(|key| !key.is_empty());

        match (base, key) {
            (Some(base), Some(key)) => Ok((base, key)),
            _ => {
                tracing::error!(
                    has_base_url = base.is_some(),
                    has_api_key = key.is_some(),
                    "provider credentials missing"
                );
                Err(WeatherError::Configuration(format!(
                    "Missing {BASE_URL_ENV} or {API_KEY_ENV}.\n\
                     Hint: run `weather configure` or set both environment variables."
                )))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeoCandidate {
    name: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn resolve_coordinate(&self, city_name: &str) -> Result<Coordinate> {
        let (base, key) = self.credentials()?;
        let url = format!("{base}/{GEOCODE_PATH}");
        tracing::debug!(%url, city = city_name, "geocoding city");

        let res = self
            .http
            .get(&url)
            .query(&[("q", city_name), ("limit", GEOCODE_LIMIT), ("appid", key)])
            .send()
            .await?;

        let body = success_body(res, "geocode").await?;

        let candidates: Vec<GeoCandidate> = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, city = city_name, "geocode response is not a location list");
            WeatherError::NoMatch(city_name.to_string())
        })?;

        let first = candidates.into_iter().next().ok_or_else(|| {
            tracing::error!(city = city_name, "geocode returned no candidates");
            WeatherError::NoMatch(city_name.to_string())
        })?;

        match (first.lat, first.lon) {
            (Some(latitude), Some(longitude)) => Ok(Coordinate {
                name: first.name.unwrap_or_else(|| city_name.to_string()),
                latitude,
                longitude,
            }),
            _ => {
                tracing::error!(city = city_name, "first geocode candidate has no coordinates");
                Err(WeatherError::NoMatch(format!(
                    "{city_name} (location data does not contain coordinates)"
                )))
            }
        }
    }

    async fn fetch_forecast(&self, coordinate: &Coordinate) -> Result<RawForecast> {
        let (base, key) = self.credentials()?;
        let url = format!("{base}/{FORECAST_PATH}");
        tracing::debug!(
            %url,
            lat = coordinate.latitude,
            lon = coordinate.longitude,
            "fetching forecast"
        );

        let lat = coordinate.latitude.to_string();
        let lon = coordinate.longitude.to_string();

        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("exclude", "minutely,hourly"),
                ("units", "imperial"),
                ("appid", key),
            ])
            .send()
            .await?;

        let body = success_body(res, "forecast").await?;

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, "forecast response could not be decoded");
            WeatherError::MalformedPayload(format!("forecast response could not be decoded: {e}"))
        })
    }
}

/// Read the body, failing with `Transport` on any non-2xx status.
async fn success_body(res: Response, what: &str) -> Result<String> {
    let status = res.status();
    let body = res.text().await?;

    if !status.is_success() {
        tracing::error!(%status, request = what, "provider returned an error status");
        return Err(WeatherError::Transport(format!(
            "{what} request failed with status {status}: {}",
            truncate_body(&body)
        )));
    }

    Ok(body)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
