// Cash inventory status events

use serde::{Deserialize, Serialize};

use crate::value_objects::AccountId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum CashInventoryStatusEvent {
    Created { account_id: AccountId },
    Deleted { account_id: AccountId },
}
