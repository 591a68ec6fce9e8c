// Cash compartment commands (inbound) and status events (outbound)

use serde::{Deserialize, Serialize};

use crate::value_objects::{AccountId, CompartmentId, CompartmentType, ErrorCode, ItemId, TransactionId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum CashCompartmentCommand {
    Accept {
        account_id: AccountId,
        compartment_type: CompartmentType,
        body: AcceptCommandBody,
    },
    Release {
        account_id: AccountId,
        compartment_type: CompartmentType,
        body: ReleaseCommandBody,
    },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptCommandBody {
    pub transaction_id: TransactionId,
    pub compartment_id: CompartmentId,
    pub item_id: ItemId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseCommandBody {
    pub transaction_id: TransactionId,
    pub compartment_id: CompartmentId,
    pub item_id: ItemId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum CashCompartmentStatusEvent {
    Created {
        account_id: AccountId,
        compartment_id: CompartmentId,
        compartment_type: CompartmentType,
        body: CompartmentCapacityBody,
    },
    Updated {
        account_id: AccountId,
        compartment_id: CompartmentId,
        compartment_type: CompartmentType,
        body: CompartmentCapacityBody,
    },
    Deleted {
        account_id: AccountId,
        compartment_id: CompartmentId,
        compartment_type: CompartmentType,
    },
    Accepted {
        account_id: AccountId,
        compartment_id: CompartmentId,
        compartment_type: CompartmentType,
        body: CompartmentTransactionBody,
    },
    Released {
        account_id: AccountId,
        compartment_id: CompartmentId,
        compartment_type: CompartmentType,
        body: CompartmentTransactionBody,
    },
    Error {
        account_id: AccountId,
        compartment_id: CompartmentId,
        compartment_type: CompartmentType,
        body: CompartmentErrorBody,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompartmentCapacityBody {
    pub capacity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompartmentTransactionBody {
    pub transaction_id: TransactionId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompartmentErrorBody {
    pub error_code: ErrorCode,
    pub transaction_id: TransactionId,
}
