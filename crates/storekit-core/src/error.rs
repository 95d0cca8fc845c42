//! Error types for storekit

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Redis error: {0}")]
    Redis(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("WRONGTYPE operation against key {0} holding the wrong kind of value")]
    WrongType(String),

    #[error("Value at {0} is not an integer or out of range")]
    NotAnInteger(String),

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<toml::ser::Error> for StoreError {
    fn from(e: toml::ser::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

impl From<::config::ConfigError> for StoreError {
    fn from(e: ::config::ConfigError) -> Self {
        StoreError::Config(e.to_string())
    }
}
