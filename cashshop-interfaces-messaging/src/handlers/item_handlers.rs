use tracing::{debug, warn};

use cashshop_application::commands::item_commands::{self, ItemGrant};
use cashshop_application::{AppError, AppState};
use cashshop_domain::messages::{CashItemCommand, Message, Topic};

use crate::error::ConsumerError;
use crate::handlers::{decode, Handled};

pub async fn handle_cash_item_command(
    state: &AppState,
    message: &Message,
) -> Result<Handled, ConsumerError> {
    let command: CashItemCommand = decode(Topic::CashItemCommand, message)?;
    match command {
        CashItemCommand::Create { character_id, body } => {
            debug!("creating item for character {}", character_id);
            item_commands::grant_item(
                state,
                ItemGrant {
                    character_id,
                    template_id: body.template_id,
                    quantity: body.quantity,
                    purchased_by: body.purchased_by,
                },
            )
            .await
            .map_err(AppError::from)?;
            Ok(Handled::Applied)
        }
        CashItemCommand::Unsupported => {
            warn!("unsupported cash item command, key {}", message.key);
            Ok(Handled::Ignored)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use cashshop_application::Metrics;
    use cashshop_domain::messages::CashItemStatusEvent;
    use cashshop_domain::{CharacterId, ReservationCache, RuntimeConfig, TemplateId};
    use cashshop_infrastructure::{
        InMemoryCharacterDirectory, InMemoryCommodityCatalog, InMemoryMessageBus, InMemoryStore,
    };

    fn state(bus: Arc<InMemoryMessageBus>) -> AppState {
        AppState {
            config: RuntimeConfig::default(),
            store: Arc::new(InMemoryStore::default()),
            catalog: Arc::new(InMemoryCommodityCatalog::default()),
            characters: Arc::new(InMemoryCharacterDirectory::default()),
            producer: bus,
            reservations: Arc::new(ReservationCache::new(Duration::from_secs(300))),
            metrics: Arc::new(Metrics::default()),
        }
    }

    #[tokio::test]
    async fn create_command_grants_an_item() {
        let bus = Arc::new(InMemoryMessageBus::default().with_journal());
        let state = state(bus.clone());
        let message = Message {
            key: "10".to_string(),
            value: json!({
                "type": "CREATE",
                "characterId": 10,
                "body": { "templateId": 5211048, "quantity": 2, "purchasedBy": 12 }
            }),
        };

        let handled = handle_cash_item_command(&state, &message)
            .await
            .expect("handled");
        assert_eq!(handled, Handled::Applied);
        let events: Vec<CashItemStatusEvent> = bus
            .published(Topic::CashItemStatus)
            .iter()
            .map(|message| message.decode().expect("item event"))
            .collect();
        assert!(matches!(
            events.as_slice(),
            [CashItemStatusEvent::Created { body, .. }]
                if body.template_id == TemplateId(5_211_048)
                    && body.quantity == 2
                    && body.purchased_by == CharacterId(12)
        ));
    }

    #[tokio::test]
    async fn unknown_item_command_is_ignored() {
        let bus = Arc::new(InMemoryMessageBus::default().with_journal());
        let state = state(bus.clone());
        let message = Message {
            key: "10".to_string(),
            value: json!({ "type": "DESTROY", "characterId": 10 }),
        };

        let handled = handle_cash_item_command(&state, &message)
            .await
            .expect("handled");
        assert_eq!(handled, Handled::Ignored);
        assert!(bus.published(Topic::CashItemStatus).is_empty());
    }
}
