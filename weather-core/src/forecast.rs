//! Projection of the raw provider series into the report shapes.
//!
//! The provider returns one entry every 3 hours, so every 8th entry is one
//! reading per day.

use chrono::NaiveDateTime;

use crate::{
    error::{Result, WeatherError},
    model::{CurrentWeather, ForecastDay},
    provider::{RawEntry, RawForecast},
};

const ENTRIES_PER_DAY: usize = 8;
const FORECAST_DAYS: usize = 5;
const DT_TXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Fields every projected record needs, pulled out of one series entry.
#[derive(Debug)]
struct Reading {
    date: String,
    temperature_f: f64,
    description: String,
    icon: String,
    humidity_percent: u8,
    wind_speed_mph: f64,
}

impl Reading {
    fn extract(entry: &RawEntry) -> Result<Self> {
        let main = entry.main.as_ref();
        let condition = entry.weather.as_ref().and_then(|w| w.first());

        let temperature_f = main.and_then(|m| m.temp).ok_or_else(|| missing("main.temp"))?;
        let description = condition
            .and_then(|c| c.description.clone())
            .ok_or_else(|| missing("weather[0].description"))?;
        let humidity_percent =
            main.and_then(|m| m.humidity).ok_or_else(|| missing("main.humidity"))?;
        let icon =
            condition.and_then(|c| c.icon.clone()).ok_or_else(|| missing("weather[0].icon"))?;
        let dt_txt = entry.dt_txt.as_deref().ok_or_else(|| missing("dt_txt"))?;

        Ok(Self {
            date: calendar_date(dt_txt)?,
            temperature_f,
            description,
            icon,
            humidity_percent,
            wind_speed_mph: entry.wind.as_ref().and_then(|w| w.speed).unwrap_or(0.0),
        })
    }
}

/// Build the current reading from the first entry of the series.
pub fn project_current(city: &str, payload: &RawForecast) -> Result<CurrentWeather> {
    let first = payload.list.as_ref().and_then(|list| list.first()).ok_or_else(|| {
        tracing::error!("forecast response does not contain a time series");
        WeatherError::MalformedPayload("response does not contain valid weather data".into())
    })?;

    let reading = Reading::extract(first)?;

    Ok(CurrentWeather {
        city: city.to_string(),
        date: reading.date,
        icon: reading.icon,
        description: reading.description,
        temperature_f: reading.temperature_f,
        wind_speed_mph: reading.wind_speed_mph,
        humidity_percent: reading.humidity_percent,
    })
}

/// Sample entries 0, 8, 16, 24 and 32 into at most five forecast days.
pub fn project_forecast(entries: &[RawEntry]) -> Result<Vec<ForecastDay>> {
    entries
        .iter()
        .step_by(ENTRIES_PER_DAY)
        .take(FORECAST_DAYS)
        .map(|entry| {
            let r = Reading::extract(entry)?;
            Ok(ForecastDay {
                date: r.date,
                temperature_f: r.temperature_f,
                description: r.description,
                humidity_percent: r.humidity_percent,
                icon: r.icon,
                wind_speed_mph: r.wind_speed_mph,
            })
        })
        .collect()
}

/// `2024-01-15 12:00:00` -> `1/15/2024`.
fn calendar_date(dt_txt: &str) -> Result<String> {
    let parsed = NaiveDateTime::parse_from_str(dt_txt, DT_TXT_FORMAT).map_err(|e| {
        WeatherError::MalformedPayload(format!("unreadable timestamp '{dt_txt}': {e}"))
    })?;
    Ok(parsed.format("%-m/%-d/%Y").to_string())
}

fn missing(field: &str) -> WeatherError {
    tracing::error!(field, "forecast entry is missing a required field");
    WeatherError::MalformedPayload(format!("missing required property {field}"))
}
