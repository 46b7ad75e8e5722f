//! Orchestrator
//!
//! Binds agent names to queues and drives publish/consume cycles through a
//! `MessageBus`, recording every message in the `CommunicationLog`.
//!
//! Publishing and logging are two separate steps. If logging fails after a
//! successful publish the message is still delivered; nothing is rolled back.

use crate::config::Settings;
use crate::error::{Error, HandlerError, Result};
use crate::messaging::{connect_bus, CommunicationLog, MessageBus, MessageHandler};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

pub struct Orchestrator {
    bus: Arc<dyn MessageBus>,
    log: Arc<CommunicationLog>,
    registry: HashMap<String, String>,
}

/// Logs each consumed message under the queue it arrived on
struct LoggingHandler<'a> {
    log: &'a CommunicationLog,
    queue: &'a str,
}

#[async_trait]
impl<'a> MessageHandler for LoggingHandler<'a> {
    async fn handle(&self, message: &str) -> std::result::Result<(), HandlerError> {
        self.log.log(self.queue, message)?;
        Ok(())
    }
}

impl Orchestrator {
    pub fn new(bus: Arc<dyn MessageBus>, log: Arc<CommunicationLog>) -> Self {
        Self {
            bus,
            log,
            registry: HashMap::new(),
        }
    }

    /// Connect the configured bus, open the log and register configured agents
    pub async fn from_settings(settings: &Settings) -> Result<Self> {
        let bus = connect_bus(&settings.bus).await?;
        let log = match CommunicationLog::open(&settings.log.db_path) {
            Ok(log) => Arc::new(log),
            Err(e) => {
                if let Err(close_err) = bus.close().await {
                    tracing::warn!("Failed to close bus after log open failure: {}", close_err);
                }
                return Err(e);
            }
        };

        let mut orchestrator = Self::new(bus, log);
        for agent in &settings.agents {
            orchestrator.register_agent(&agent.name, &agent.queue);
        }
        Ok(orchestrator)
    }

    /// Register or overwrite the queue an agent listens on
    pub fn register_agent(&mut self, name: impl Into<String>, queue: impl Into<String>) {
        let name = name.into();
        let queue = queue.into();
        tracing::debug!(agent = %name, queue = %queue, "Agent registered");
        self.registry.insert(name, queue);
    }

    pub fn queue_for(&self, agent_name: &str) -> Result<&str> {
        self.registry
            .get(agent_name)
            .map(String::as_str)
            .ok_or_else(|| Error::UnknownAgent(agent_name.to_string()))
    }

    /// All registrations as (agent, queue), sorted by agent name
    pub fn agents(&self) -> Vec<(String, String)> {
        let mut agents: Vec<(String, String)> = self
            .registry
            .iter()
            .map(|(name, queue)| (name.clone(), queue.clone()))
            .collect();
        agents.sort();
        agents
    }

    pub fn bus(&self) -> &Arc<dyn MessageBus> {
        &self.bus
    }

    pub fn log(&self) -> &Arc<CommunicationLog> {
        &self.log
    }

    /// Publish `message` to the agent's queue, then log it
    pub async fn send(&self, agent_name: &str, message: &str) -> Result<()> {
        let queue = self.queue_for(agent_name)?;
        self.bus.publish(queue, message).await?;
        self.log.log(queue, message)?;
        tracing::info!(agent = agent_name, queue, "Message sent");
        Ok(())
    }

    /// Drain the agent's queue once, logging every delivered message.
    /// Returns the number of messages logged.
    pub async fn monitor(&self, agent_name: &str) -> Result<usize> {
        let queue = self.queue_for(agent_name)?;
        let handler = LoggingHandler {
            log: &self.log,
            queue,
        };
        let handled = self
            .bus
            .consume(queue, &handler)
            .await
            .map_err(unwrap_log_failure)?;
        tracing::info!(agent = agent_name, queue, handled, "Monitor pass complete");
        Ok(handled)
    }

    /// Close the bus, then the log. The log is closed even if the bus fails;
    /// the first error is returned.
    pub async fn close(&self) -> Result<()> {
        let bus_result = self.bus.close().await;
        let log_result = self.log.close();

        if let Err(e) = &bus_result {
            tracing::error!("Failed to close message bus: {}", e);
        }
        bus_result.and(log_result)
    }
}

/// Log failures raised inside the monitor handler surface as their own
/// variant (`Storage`, `Closed`) instead of a boxed handler error.
fn unwrap_log_failure(err: Error) -> Error {
    match err {
        Error::Handler(source) => match source.downcast::<Error>() {
            Ok(inner) => *inner,
            Err(source) => Error::Handler(source),
        },
        other => other,
    }
}
