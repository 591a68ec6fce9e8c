// Character inventory type value object

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Inventory tabs of a character, owned by the foreign inventory service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum InventoryType {
    Equip,
    Use,
    Setup,
    Etc,
    Cash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown inventory type {0}")]
pub struct UnknownInventoryType(pub i64);

/// First template id of the slot-expansion coupons sold by the catalog.
const SLOT_COUPON_BASE: u32 = 9_110_000;

impl InventoryType {
    pub const ALL: [InventoryType; 5] = [
        InventoryType::Equip,
        InventoryType::Use,
        InventoryType::Setup,
        InventoryType::Etc,
        InventoryType::Cash,
    ];

    pub fn code(&self) -> u8 {
        match self {
            InventoryType::Equip => 1,
            InventoryType::Use => 2,
            InventoryType::Setup => 3,
            InventoryType::Etc => 4,
            InventoryType::Cash => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InventoryType::Equip => "EQUIP",
            InventoryType::Use => "USE",
            InventoryType::Setup => "SETUP",
            InventoryType::Etc => "ETC",
            InventoryType::Cash => "CASH",
        }
    }

    /// Slot coupons are numbered 9110000 + 1000 * (type - 1).
    pub fn for_slot_coupon(template_id: u32) -> Result<Self, UnknownInventoryType> {
        let offset = i64::from(template_id) - i64::from(SLOT_COUPON_BASE);
        if offset < 0 {
            return Err(UnknownInventoryType(offset));
        }
        let code = offset / 1000 + 1;
        u8::try_from(code)
            .map_err(|_| UnknownInventoryType(code))
            .and_then(|value| {
                InventoryType::try_from(value).map_err(|_| UnknownInventoryType(code))
            })
    }
}

impl TryFrom<u8> for InventoryType {
    type Error = UnknownInventoryType;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(InventoryType::Equip),
            2 => Ok(InventoryType::Use),
            3 => Ok(InventoryType::Setup),
            4 => Ok(InventoryType::Etc),
            5 => Ok(InventoryType::Cash),
            other => Err(UnknownInventoryType(i64::from(other))),
        }
    }
}

impl From<InventoryType> for u8 {
    fn from(value: InventoryType) -> Self {
        value.code()
    }
}
