use serde::{Deserialize, Serialize};

/// A geocoded place. Only lives long enough to parameterize the forecast call.
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinate {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWeather {
    pub city: String,
    pub date: String,
    pub icon: String,
    #[serde(rename = "iconDescription")]
    pub description: String,
    #[serde(rename = "tempF")]
    pub temperature_f: f64,
    #[serde(rename = "windSpeed")]
    pub wind_speed_mph: f64,
    #[serde(rename = "humidity")]
    pub humidity_percent: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: String,
    #[serde(rename = "tempF")]
    pub temperature_f: f64,
    pub description: String,
    #[serde(rename = "humidity")]
    pub humidity_percent: u8,
    pub icon: String,
    #[serde(rename = "wind")]
    pub wind_speed_mph: f64,
}

/// What a successful city query produces: one current reading plus up to
/// five daily samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub current_weather: CurrentWeather,
    pub forecast: Vec<ForecastDay>,
}

/// A previously searched city as persisted in the history file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: String,
    pub name: String,
}

impl City {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}
