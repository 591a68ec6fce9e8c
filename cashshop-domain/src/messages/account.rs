// Account status events consumed from the account service

use serde::{Deserialize, Serialize};

use crate::value_objects::AccountId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountStatusEvent {
    pub account_id: AccountId,
    pub name: Option<String>,
    pub status: AccountStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    Created,
    Deleted,
    #[serde(other)]
    Other,
}
