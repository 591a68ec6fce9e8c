use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Topic {
    #[serde(rename = "EVENT_TOPIC_ACCOUNT_STATUS")]
    AccountStatus,
    #[serde(rename = "COMMAND_TOPIC_CASH_SHOP")]
    CashShopCommand,
    #[serde(rename = "EVENT_TOPIC_CASH_SHOP_STATUS")]
    CashShopStatus,
    #[serde(rename = "COMMAND_TOPIC_CASH_COMPARTMENT")]
    CashCompartmentCommand,
    #[serde(rename = "EVENT_TOPIC_CASH_COMPARTMENT_STATUS")]
    CashCompartmentStatus,
    #[serde(rename = "EVENT_TOPIC_CASH_INVENTORY_STATUS")]
    CashInventoryStatus,
    #[serde(rename = "COMMAND_TOPIC_CASH_ITEM")]
    CashItemCommand,
    #[serde(rename = "STATUS_TOPIC_CASH_ITEM")]
    CashItemStatus,
    #[serde(rename = "COMMAND_TOPIC_COMPARTMENT")]
    CharacterCompartmentCommand,
    #[serde(rename = "EVENT_TOPIC_COMPARTMENT_STATUS")]
    CharacterCompartmentStatus,
    #[serde(rename = "EVENT_TOPIC_WALLET_STATUS")]
    WalletStatus,
}

impl Topic {
    pub const ALL: [Topic; 11] = [
        Topic::AccountStatus,
        Topic::CashShopCommand,
        Topic::CashShopStatus,
        Topic::CashCompartmentCommand,
        Topic::CashCompartmentStatus,
        Topic::CashInventoryStatus,
        Topic::CashItemCommand,
        Topic::CashItemStatus,
        Topic::CharacterCompartmentCommand,
        Topic::CharacterCompartmentStatus,
        Topic::WalletStatus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::AccountStatus => "EVENT_TOPIC_ACCOUNT_STATUS",
            Topic::CashShopCommand => "COMMAND_TOPIC_CASH_SHOP",
            Topic::CashShopStatus => "EVENT_TOPIC_CASH_SHOP_STATUS",
            Topic::CashCompartmentCommand => "COMMAND_TOPIC_CASH_COMPARTMENT",
            Topic::CashCompartmentStatus => "EVENT_TOPIC_CASH_COMPARTMENT_STATUS",
            Topic::CashInventoryStatus => "EVENT_TOPIC_CASH_INVENTORY_STATUS",
            Topic::CashItemCommand => "COMMAND_TOPIC_CASH_ITEM",
            Topic::CashItemStatus => "STATUS_TOPIC_CASH_ITEM",
            Topic::CharacterCompartmentCommand => "COMMAND_TOPIC_COMPARTMENT",
            Topic::CharacterCompartmentStatus => "EVENT_TOPIC_COMPARTMENT_STATUS",
            Topic::WalletStatus => "EVENT_TOPIC_WALLET_STATUS",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A keyed JSON payload as it travels over the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub key: String,
    pub value: serde_json::Value,
}

impl Message {
    pub fn encode<K, T>(key: K, payload: &T) -> serde_json::Result<Self>
    where
        K: fmt::Display,
        T: Serialize,
    {
        Ok(Self {
            key: key.to_string(),
            value: serde_json::to_value(payload)?,
        })
    }

    pub fn decode<T>(&self) -> serde_json::Result<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        T::deserialize(&self.value)
    }
}
