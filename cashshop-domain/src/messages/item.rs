// Cash item commands and status events

use serde::{Deserialize, Serialize};

use crate::entities::Item;
use crate::value_objects::{CashId, CharacterId, ItemId, TemplateId};

/// Administrative item grants, outside of any purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum CashItemCommand {
    Create {
        character_id: CharacterId,
        body: CreateItemBody,
    },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemBody {
    pub template_id: TemplateId,
    pub quantity: u32,
    pub purchased_by: CharacterId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum CashItemStatusEvent {
    Created { item_id: ItemId, body: ItemCreatedBody },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemCreatedBody {
    pub cash_id: CashId,
    pub template_id: TemplateId,
    pub quantity: u32,
    pub purchased_by: CharacterId,
    pub flag: u16,
}

impl From<&Item> for CashItemStatusEvent {
    fn from(item: &Item) -> Self {
        CashItemStatusEvent::Created {
            item_id: item.id,
            body: ItemCreatedBody {
                cash_id: item.cash_id,
                template_id: item.template_id,
                quantity: item.quantity,
                purchased_by: item.purchased_by,
                flag: item.flag,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_command_decodes_from_wire_shape() {
        let command: CashItemCommand = serde_json::from_value(json!({
            "type": "CREATE",
            "characterId": 10,
            "body": { "templateId": 5211048, "quantity": 1, "purchasedBy": 10 }
        }))
        .expect("decode");
        assert_eq!(
            command,
            CashItemCommand::Create {
                character_id: CharacterId(10),
                body: CreateItemBody {
                    template_id: TemplateId(5_211_048),
                    quantity: 1,
                    purchased_by: CharacterId(10),
                },
            }
        );
    }
}
