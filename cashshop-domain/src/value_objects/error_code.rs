// Error codes carried by ERROR status events

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    UnknownError,
    NotEnoughCash,
    InventoryFull,
    ItemNotFound,
    ItemAlreadyReserved,
    AssetCreationFailed,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::UnknownError => "UNKNOWN_ERROR",
            ErrorCode::NotEnoughCash => "NOT_ENOUGH_CASH",
            ErrorCode::InventoryFull => "INVENTORY_FULL",
            ErrorCode::ItemNotFound => "ITEM_NOT_FOUND",
            ErrorCode::ItemAlreadyReserved => "ITEM_ALREADY_RESERVED",
            ErrorCode::AssetCreationFailed => "ASSET_CREATION_FAILED",
        }
    }
}
