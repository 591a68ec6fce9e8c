use tracing::debug;

use cashshop_application::commands::transfer_commands::{self, CallbackOutcome, MoveCompletion};
use cashshop_application::{AppError, AppState};
use cashshop_domain::messages::{CharacterCompartmentStatusEvent, Message, Topic};

use crate::error::ConsumerError;
use crate::handlers::{decode, Handled};

/// Status events of the character compartment service that settle a pending
/// move out of the cash inventory.
pub async fn handle_compartment_status(
    state: &AppState,
    message: &Message,
) -> Result<Handled, ConsumerError> {
    let event: CharacterCompartmentStatusEvent =
        decode(Topic::CharacterCompartmentStatus, message)?;
    let outcome = match event {
        CharacterCompartmentStatusEvent::CashItemMoved {
            character_id,
            compartment_id,
            body,
        } => transfer_commands::moved_from(
            state,
            MoveCompletion {
                character_id,
                item_id: body.cash_item_id,
                compartment_id,
                slot: body.slot,
                transaction_id: body.transaction_id,
            },
        )
        .await
        .map_err(AppError::from)?,
        CharacterCompartmentStatusEvent::Error {
            character_id, body, ..
        } => {
            if !body.is_cash_item_move_failure() {
                debug!(
                    "compartment error {} for character {} is not a move failure",
                    body.error_code, character_id
                );
                return Ok(Handled::Ignored);
            }
            let Some(item_id) = body.cash_item_id else {
                debug!(
                    "compartment error {} for character {} does not concern a cash item",
                    body.error_code, character_id
                );
                return Ok(Handled::Ignored);
            };
            transfer_commands::move_from_failed(state, character_id, item_id, body.transaction_id)
                .await
                .map_err(AppError::from)?
        }
        CharacterCompartmentStatusEvent::Other => return Ok(Handled::Ignored),
    };
    Ok(match outcome {
        CallbackOutcome::Applied => Handled::Applied,
        CallbackOutcome::Dropped => Handled::Ignored,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use cashshop_application::Metrics;
    use cashshop_domain::messages::{CashShopStatusEvent, CASH_ITEM_MOVE_FAILED};
    use cashshop_domain::{CharacterId, ErrorCode, ItemId, ReservationCache, RuntimeConfig};
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

    fn error_event(error_code: &str, cash_item_id: u32) -> Message {
        Message {
            key: "10".to_string(),
            value: json!({
                "type": "ERROR",
                "characterId": 10,
                "compartmentId": "00000000-0000-0000-0000-000000000000",
                "body": { "errorCode": error_code, "cashItemId": cash_item_id }
            }),
        }
    }

    #[tokio::test]
    async fn unrelated_error_keeps_the_item_reserved() {
        let bus = Arc::new(InMemoryMessageBus::default().with_journal());
        let state = state(bus.clone());
        assert!(state.reservations.reserve(ItemId(77), CharacterId(10)));

        let handled = handle_compartment_status(&state, &error_event("INVENTORY_FULL", 77))
            .await
            .expect("handled");
        assert_eq!(handled, Handled::Ignored);
        assert!(state.reservations.is_reserved(ItemId(77)));
        assert!(bus.published(Topic::CashShopStatus).is_empty());
    }

    #[tokio::test]
    async fn move_failure_releases_the_item() {
        let bus = Arc::new(InMemoryMessageBus::default().with_journal());
        let state = state(bus.clone());
        assert!(state.reservations.reserve(ItemId(77), CharacterId(10)));

        let handled = handle_compartment_status(&state, &error_event(CASH_ITEM_MOVE_FAILED, 77))
            .await
            .expect("handled");
        assert_eq!(handled, Handled::Applied);
        assert!(!state.reservations.is_reserved(ItemId(77)));
        let events: Vec<CashShopStatusEvent> = bus
            .published(Topic::CashShopStatus)
            .iter()
            .map(|message| message.decode().expect("event"))
            .collect();
        assert_eq!(
            events,
            vec![CashShopStatusEvent::error(CharacterId(10), ErrorCode::UnknownError)]
        );
    }
}
