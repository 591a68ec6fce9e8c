// Wallet entity

use serde::{Deserialize, Serialize};

use crate::value_objects::{AccountId, Currency};

/// Per-account balances. Each currency lane is independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub account_id: AccountId,
    pub credit: u32,
    pub points: u32,
    pub prepaid: u32,
}

impl Wallet {
    pub fn new(account_id: AccountId, credit: u32, points: u32, prepaid: u32) -> Self {
        Self {
            account_id,
            credit,
            points,
            prepaid,
        }
    }

    pub fn empty(account_id: AccountId) -> Self {
        Self::new(account_id, 0, 0, 0)
    }

    pub fn balance(&self, currency: Currency) -> u32 {
        match currency {
            Currency::Credit => self.credit,
            Currency::Points => self.points,
            Currency::Prepaid => self.prepaid,
        }
    }

    pub fn can_afford(&self, currency: Currency, amount: u32) -> bool {
        self.balance(currency) >= amount
    }

    /// Returns a copy with `amount` taken from the given lane. The affordability
    /// check belongs to the caller; an overdraw saturates at zero.
    pub fn purchase(&self, currency: Currency, amount: u32) -> Wallet {
        let mut next = *self;
        let lane = match currency {
            Currency::Credit => &mut next.credit,
            Currency::Points => &mut next.points,
            Currency::Prepaid => &mut next.prepaid,
        };
        *lane = lane.saturating_sub(amount);
        next
    }
}
