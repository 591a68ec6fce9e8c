// Commands to and status events from the character compartment service

use serde::{Deserialize, Serialize};

use crate::value_objects::{CharacterId, CompartmentId, InventoryType, ItemId, TransactionId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum CharacterCompartmentCommand {
    IncreaseCapacity {
        character_id: CharacterId,
        inventory_type: InventoryType,
        body: IncreaseCapacityBody,
    },
    MoveCashItem {
        character_id: CharacterId,
        inventory_type: InventoryType,
        body: MoveCashItemBody,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncreaseCapacityBody {
    pub amount: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveCashItemBody {
    pub slot: i16,
    pub cash_item_id: ItemId,
    pub transaction_id: TransactionId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum CharacterCompartmentStatusEvent {
    CashItemMoved {
        character_id: CharacterId,
        compartment_id: CompartmentId,
        body: CashItemMovedStatusBody,
    },
    Error {
        character_id: CharacterId,
        compartment_id: CompartmentId,
        body: CompartmentErrorStatusBody,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashItemMovedStatusBody {
    pub cash_item_id: ItemId,
    pub slot: i16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<TransactionId>,
}

/// Error code the character compartment service reports when a
/// `MOVE_CASH_ITEM` could not be applied.
pub const CASH_ITEM_MOVE_FAILED: &str = "CASH_ITEM_MOVE_FAILED";

/// Only move failures that carry a cash item id concern this service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompartmentErrorStatusBody {
    pub error_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cash_item_id: Option<ItemId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<TransactionId>,
}

impl CompartmentErrorStatusBody {
    pub fn is_cash_item_move_failure(&self) -> bool {
        self.error_code == CASH_ITEM_MOVE_FAILED
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn move_command_carries_transaction_id() {
        let transaction_id = TransactionId(uuid::Uuid::nil());
        let command = CharacterCompartmentCommand::MoveCashItem {
            character_id: CharacterId(9),
            inventory_type: InventoryType::Cash,
            body: MoveCashItemBody {
                slot: 4,
                cash_item_id: ItemId(77),
                transaction_id,
            },
        };
        let value = serde_json::to_value(&command).expect("encode");
        assert_eq!(value["type"], "MOVE_CASH_ITEM");
        assert_eq!(value["inventoryType"], 5);
        assert_eq!(value["body"]["cashItemId"], 77);
        assert_eq!(
            value["body"]["transactionId"],
            "00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn unrelated_status_types_are_ignored() {
        let event: CharacterCompartmentStatusEvent = serde_json::from_value(json!({
            "type": "CAPACITY_CHANGED",
            "characterId": 9,
            "compartmentId": "00000000-0000-0000-0000-000000000000",
            "body": {"capacity": 24}
        }))
        .expect("decode");
        assert_eq!(event, CharacterCompartmentStatusEvent::Other);
    }
}
