// Asset entity

use serde::{Deserialize, Serialize};

use crate::entities::{Decoration, Item};
use crate::value_objects::{AssetId, CashId, CompartmentId, ItemId};

/// Placement of one item inside one compartment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub compartment_id: CompartmentId,
    pub item_id: ItemId,
}

/// An asset joined with the item it references.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetView {
    pub asset: Asset,
    pub item: Decoration<Item>,
}

impl AssetView {
    pub fn holds_cash_id(&self, cash_id: CashId) -> bool {
        self.item
            .resolved()
            .map(|item| item.cash_id == cash_id)
            .unwrap_or(false)
    }
}
