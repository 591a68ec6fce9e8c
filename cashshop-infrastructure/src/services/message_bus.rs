use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use cashshop_domain::messages::{Message, Topic};
use cashshop_domain::ports::MessageProducer;

const CHANNEL_BUFFER: usize = 256;

/// In-process topic bus. Every published message is fanned out to live
/// subscribers of its topic. A journal of everything published is kept only
/// when enabled with `with_journal`.
pub struct InMemoryMessageBus {
    capacity: usize,
    channels: RwLock<HashMap<Topic, broadcast::Sender<Message>>>,
    journal: Option<Mutex<HashMap<Topic, Vec<Message>>>>,
    failing: AtomicBool,
}

impl Default for InMemoryMessageBus {
    fn default() -> Self {
        Self::new(CHANNEL_BUFFER)
    }
}

impl InMemoryMessageBus {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            channels: RwLock::new(HashMap::new()),
            journal: None,
            failing: AtomicBool::new(false),
        }
    }

    /// Records every published message until `clear`.
    pub fn with_journal(mut self) -> Self {
        self.journal = Some(Mutex::new(HashMap::new()));
        self
    }

    pub async fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Message> {
        let mut channels = self.channels.write().await;
        channels
            .entry(topic)
            .or_insert_with(|| {
                let (tx, _rx) = broadcast::channel(self.capacity);
                tx
            })
            .subscribe()
    }

    /// Everything published to `topic` since the last `clear`. Always empty
    /// without a journal.
    pub fn published(&self, topic: Topic) -> Vec<Message> {
        self.journal
            .as_ref()
            .and_then(|journal| journal.lock().get(&topic).cloned())
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Some(journal) = &self.journal {
            journal.lock().clear();
        }
    }

    /// While set, `publish` refuses every batch.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl MessageProducer for InMemoryMessageBus {
    async fn publish(&self, topic: Topic, messages: Vec<Message>) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(anyhow!("transport unavailable for {}", topic));
        }
        if let Some(journal) = &self.journal {
            journal
                .lock()
                .entry(topic)
                .or_default()
                .extend(messages.iter().cloned());
        }

        let channels = self.channels.read().await;
        if let Some(tx) = channels.get(&topic) {
            for message in messages {
                if tx.send(message).is_err() {
                    debug!("no live subscriber on {}", topic);
                }
            }
        }
        Ok(())
    }
}
