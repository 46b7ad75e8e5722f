//! Error types for crewlink

use thiserror::Error;

/// Error returned by a message handler passed to `MessageBus::consume`
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// The main error type for crewlink operations
#[derive(Error, Debug)]
pub enum Error {
    /// Agent name has no queue registration
    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    /// Broker could not be reached when the bus was built
    #[error("Connection error: {0}")]
    Connection(String),

    /// Broker connection failed mid-operation
    #[error("Transport error: {0}")]
    Transport(String),

    /// Resource used after `close()`
    #[error("{0} is closed")]
    Closed(&'static str),

    /// Communication log persistence failure
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Consumer callback failed; the message was not removed or acknowledged
    #[error("Handler error: {0}")]
    Handler(#[source] HandlerError),

    /// Delivered payload is not valid UTF-8
    #[error("Decode error: {0}")]
    Decode(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Agent definition lookup failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Prebuilt crew name not found
    #[error("Unknown crew: {0}")]
    UnknownCrew(String),
}

/// A specialized Result type for crewlink operations
pub type Result<T> = std::result::Result<T, Error>;

impl From<lapin::Error> for Error {
    fn from(e: lapin::Error) -> Self {
        Error::Transport(e.to_string())
    }
}
