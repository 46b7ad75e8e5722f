mod settings;

pub use settings::{AgentRegistration, BusBackend, BusConfig, LogConfig, LoggingConfig, Settings};
