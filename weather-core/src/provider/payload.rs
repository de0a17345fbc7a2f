//! Wire shapes of the OpenWeather 5-day/3-hour forecast response.
//!
//! Every field is optional so that a missing value reaches the projector,
//! which decides what is required, instead of failing inside serde.

use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawForecast {
    pub list: Option<Vec<RawEntry>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawEntry {
    pub main: Option<RawMain>,
    pub weather: Option<Vec<RawCondition>>,
    pub wind: Option<RawWind>,
    pub dt_txt: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawMain {
    pub temp: Option<f64>,
    pub humidity: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawCondition {
    pub description: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawWind {
    pub speed: Option<f64>,
}
