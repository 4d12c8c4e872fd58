use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("invalid rate period stack: {message}")]
    InvalidRatePeriodStack {
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },

    #[error("too many scenarios to compare: maximum {max}, requested {requested}")]
    TooManyScenarios {
        max: usize,
        requested: usize,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimulationError>;
