use thiserror::Error;

/// Every failure the query pipeline and the history store can surface.
///
/// Nothing in the core recovers from these; they are classified here and
/// turned into user-facing output by whoever serves the request.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Provider is not configured: {0}")]
    Configuration(String),

    #[error("Weather provider request failed: {0}")]
    Transport(String),

    #[error("No location data found for city: {0}")]
    NoMatch(String),

    #[error("Malformed weather data: {0}")]
    MalformedPayload(String),

    #[error("Search history is unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Failed to save search history: {0}")]
    StorePersist(String),
}

impl WeatherError {
    /// Short stable label, handy as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            WeatherError::InvalidInput(_) => "invalid_input",
            WeatherError::Configuration(_) => "configuration",
            WeatherError::Transport(_) => "transport",
            WeatherError::NoMatch(_) => "no_match",
            WeatherError::MalformedPayload(_) => "malformed_payload",
            WeatherError::StoreUnavailable(_) => "store_unavailable",
            WeatherError::StorePersist(_) => "store_persist",
        }
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        WeatherError::Transport(err.to_string())
    }
}

pub type Result<T, E = WeatherError> = std::result::Result<T, E>;
