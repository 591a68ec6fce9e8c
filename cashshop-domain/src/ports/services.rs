use async_trait::async_trait;
use thiserror::Error;

use crate::entities::{Character, Commodity};
use crate::messages::{Message, Topic};
use crate::value_objects::{CharacterId, SerialNumber};

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("transport error: {0}")]
    Transport(#[source] anyhow::Error),
}

#[async_trait]
pub trait CommodityCatalog: Send + Sync {
    async fn commodity_by_serial(&self, serial_number: SerialNumber) -> Result<Commodity, LookupError>;
}

#[async_trait]
pub trait CharacterDirectory: Send + Sync {
    async fn character_by_id(
        &self,
        character_id: CharacterId,
        with_inventory: bool,
    ) -> Result<Character, LookupError>;
}

#[async_trait]
pub trait MessageProducer: Send + Sync {
    /// Publishes the messages to one topic in order.
    async fn publish(&self, topic: Topic, messages: Vec<Message>) -> anyhow::Result<()>;
}
