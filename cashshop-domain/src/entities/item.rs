// Item entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{CashId, CharacterId, ItemId, TemplateId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub cash_id: CashId,
    pub template_id: TemplateId,
    pub quantity: u32,
    pub flag: u16,
    pub purchased_by: CharacterId,
    pub expiration: DateTime<Utc>,
}

/// An item before the store has assigned its durable id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub cash_id: CashId,
    pub template_id: TemplateId,
    pub quantity: u32,
    pub flag: u16,
    pub purchased_by: CharacterId,
    pub expiration: DateTime<Utc>,
}

impl NewItem {
    pub fn with_id(self, id: ItemId) -> Item {
        Item {
            id,
            cash_id: self.cash_id,
            template_id: self.template_id,
            quantity: self.quantity,
            flag: self.flag,
            purchased_by: self.purchased_by,
            expiration: self.expiration,
        }
    }
}
