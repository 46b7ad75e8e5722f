//! crewlink - queue-based message routing between agents
//!
//! This library lets named agents exchange text messages through queues
//! (in-process or on an AMQP broker) and records every routed message in a
//! durable SQLite communication log.

pub mod agents;
pub mod cli;
pub mod config;
pub mod error;
pub mod messaging;
pub mod orchestrator;
pub mod utils;

pub use config::Settings;
pub use error::{Error, HandlerError, Result};
pub use messaging::{
    connect_bus, AmqpMessageBus, CommunicationLog, InMemoryMessageBus, LogRecord, MessageBus,
    MessageHandler,
};
pub use orchestrator::Orchestrator;
