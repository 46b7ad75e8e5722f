//! In-Memory Message Bus
//!
//! Information Hiding:
//! - Queue map and its lock hidden behind the `MessageBus` interface
//! - Queues are created on first publish or consume
//! - Suitable for testing and single-process setups
//!
//! A message whose handler fails goes back to the head of its queue, so the
//! next `consume` retries it first.

use super::{MessageBus, MessageHandler};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory bus using a map of FIFO queues
/// Pending messages are lost on `close()` or when the process terminates
pub struct InMemoryMessageBus {
    queues: Arc<RwLock<HashMap<String, VecDeque<String>>>>,
    closed: AtomicBool,
}

impl InMemoryMessageBus {
    pub fn new() -> Self {
        Self {
            queues: Arc::new(RwLock::new(HashMap::new())),
            closed: AtomicBool::new(false),
        }
    }

    /// Number of messages waiting in `queue`
    pub async fn pending(&self, queue: &str) -> usize {
        let queues = self.queues.read().await;
        queues.get(queue).map(VecDeque::len).unwrap_or(0)
    }

    /// Names of every queue created so far, sorted
    pub async fn queue_names(&self) -> Vec<String> {
        let queues = self.queues.read().await;
        let mut names: Vec<String> = queues.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(Error::Closed("message bus"));
        }
        Ok(())
    }

    async fn pop_front(&self, queue: &str) -> Option<String> {
        let mut queues = self.queues.write().await;
        queues.entry(queue.to_string()).or_default().pop_front()
    }

    async fn push_front(&self, queue: &str, message: String) {
        let mut queues = self.queues.write().await;
        queues.entry(queue.to_string()).or_default().push_front(message);
    }
}

impl Default for InMemoryMessageBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageBus for InMemoryMessageBus {
    async fn publish(&self, queue: &str, message: &str) -> Result<()> {
        self.ensure_open()?;
        let mut queues = self.queues.write().await;
        queues
            .entry(queue.to_string())
            .or_default()
            .push_back(message.to_string());
        tracing::debug!("[InMemoryMessageBus] Published to '{}'", queue);
        Ok(())
    }

    async fn consume(&self, queue: &str, handler: &dyn MessageHandler) -> Result<usize> {
        self.ensure_open()?;
        let mut handled = 0;

        // Lock is released before the handler runs so it may publish freely.
        while let Some(message) = self.pop_front(queue).await {
            if let Err(e) = handler.handle(&message).await {
                tracing::warn!(
                    "[InMemoryMessageBus] Handler failed on '{}', message requeued at head: {}",
                    queue,
                    e
                );
                // A bus closed meanwhile stays empty.
                if !self.is_closed() {
                    self.push_front(queue, message).await;
                }
                return Err(Error::Handler(e));
            }
            handled += 1;
        }

        tracing::debug!("[InMemoryMessageBus] Consumed {} messages from '{}'", handled, queue);
        Ok(handled)
    }

    async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        let mut queues = self.queues.write().await;
        let dropped: usize = queues.values().map(VecDeque::len).sum();
        queues.clear();
        tracing::debug!("[InMemoryMessageBus] Closed, discarded {} pending messages", dropped);
        Ok(())
    }
}
