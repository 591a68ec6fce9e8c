use std::fmt::Display;

use cashshop_domain::messages::{Message, Topic};
use cashshop_domain::ports::MessageProducer;
use serde::Serialize;

/// Messages produced by one unit of work, held back until its transaction
/// has committed.
#[derive(Debug, Default)]
pub struct MessageBuffer {
    entries: Vec<(Topic, Message)>,
}

impl MessageBuffer {
    pub fn put<K, T>(&mut self, topic: Topic, key: K, payload: &T) -> anyhow::Result<()>
    where
        K: Display,
        T: Serialize,
    {
        let message = Message::encode(key, payload)?;
        self.entries.push((topic, message));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn topics(&self) -> Vec<Topic> {
        let mut topics: Vec<Topic> = Vec::new();
        for (topic, _) in &self.entries {
            if !topics.contains(topic) {
                topics.push(*topic);
            }
        }
        topics
    }

    /// Publishes everything, one batch per topic, keeping the order in which
    /// messages were put within each topic.
    pub async fn flush(self, producer: &dyn MessageProducer) -> anyhow::Result<()> {
        let topics = self.topics();
        let mut entries = self.entries;
        for topic in topics {
            let (batch, rest): (Vec<_>, Vec<_>) =
                entries.into_iter().partition(|(candidate, _)| *candidate == topic);
            entries = rest;
            let messages = batch.into_iter().map(|(_, message)| message).collect();
            producer.publish(topic, messages).await?;
        }
        Ok(())
    }
}
