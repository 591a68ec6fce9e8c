// Currency value object

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The three independent balance lanes of a wallet, keyed by their wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Currency {
    Credit,
    Points,
    Prepaid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown currency code {0}")]
pub struct UnknownCurrency(pub u32);

impl Currency {
    pub const ALL: [Currency; 3] = [Currency::Credit, Currency::Points, Currency::Prepaid];

    pub fn code(&self) -> u32 {
        match self {
            Currency::Credit => 1,
            Currency::Points => 2,
            Currency::Prepaid => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Credit => "CREDIT",
            Currency::Points => "POINTS",
            Currency::Prepaid => "PREPAID",
        }
    }
}

impl TryFrom<u32> for Currency {
    type Error = UnknownCurrency;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Currency::Credit),
            2 => Ok(Currency::Points),
            4 => Ok(Currency::Prepaid),
            other => Err(UnknownCurrency(other)),
        }
    }
}

impl From<Currency> for u32 {
    fn from(currency: Currency) -> Self {
        currency.code()
    }
}
