// Character entity as seen through the character service

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value_objects::{AccountId, CharacterId, InventoryType};

/// Hard ceiling on slots of any character inventory tab.
pub const MAX_INVENTORY_SLOTS: u32 = 96;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub account_id: AccountId,
    pub name: String,
    pub job_id: u16,
    /// Present only when the inventory was requested with the lookup.
    pub inventory: Option<InventoryCapacities>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryCapacities(pub BTreeMap<InventoryType, u32>);

impl InventoryCapacities {
    pub fn capacity(&self, inventory_type: InventoryType) -> Option<u32> {
        self.0.get(&inventory_type).copied()
    }

    pub fn with(mut self, inventory_type: InventoryType, capacity: u32) -> Self {
        self.0.insert(inventory_type, capacity);
        self
    }
}
