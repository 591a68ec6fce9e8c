// Cash shop commands (inbound) and status events (outbound)

use serde::{Deserialize, Serialize};

use crate::value_objects::{
    AssetId, CashId, CharacterId, CompartmentId, ErrorCode, InventoryType, ItemId, SerialNumber,
    TemplateId,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum CashShopCommand {
    Purchase {
        character_id: CharacterId,
        body: PurchaseCommandBody,
    },
    RequestInventoryIncreaseByType {
        character_id: CharacterId,
        body: InventoryIncreaseByTypeBody,
    },
    RequestInventoryIncreaseByItem {
        character_id: CharacterId,
        body: InventoryIncreaseByItemBody,
    },
    MoveFromCashInventory {
        character_id: CharacterId,
        body: MoveFromCashInventoryBody,
    },
    #[serde(other)]
    Unsupported,
}

/// Currency codes stay raw here so that an unknown code reaches the
/// orchestrator and is answered with an error event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseCommandBody {
    pub currency: u32,
    pub serial_number: SerialNumber,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryIncreaseByTypeBody {
    pub currency: u32,
    pub inventory_type: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryIncreaseByItemBody {
    pub currency: u32,
    pub serial_number: SerialNumber,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveFromCashInventoryBody {
    pub serial_number: CashId,
    pub inventory_type: u8,
    pub slot: i16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum CashShopStatusEvent {
    Purchase {
        character_id: CharacterId,
        body: PurchaseBody,
    },
    InventoryCapacityIncreased {
        character_id: CharacterId,
        body: CapacityIncreasedBody,
    },
    CashItemMovedToInventory {
        character_id: CharacterId,
        body: CashItemMovedBody,
    },
    Error {
        character_id: CharacterId,
        body: ErrorBody,
    },
}

impl CashShopStatusEvent {
    pub fn error(character_id: CharacterId, code: ErrorCode) -> Self {
        CashShopStatusEvent::Error {
            character_id,
            body: ErrorBody { error: code },
        }
    }

    pub fn character_id(&self) -> CharacterId {
        match self {
            CashShopStatusEvent::Purchase { character_id, .. }
            | CashShopStatusEvent::InventoryCapacityIncreased { character_id, .. }
            | CashShopStatusEvent::CashItemMovedToInventory { character_id, .. }
            | CashShopStatusEvent::Error { character_id, .. } => *character_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseBody {
    pub template_id: TemplateId,
    pub price: u32,
    pub compartment_id: CompartmentId,
    pub asset_id: AssetId,
    pub item_id: ItemId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityIncreasedBody {
    pub inventory_type: InventoryType,
    pub capacity: u32,
    pub amount: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashItemMovedBody {
    pub compartment_id: CompartmentId,
    pub slot: i16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorCode,
}
