// Wallet status events

use serde::{Deserialize, Serialize};

use crate::entities::Wallet;
use crate::value_objects::AccountId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum WalletStatusEvent {
    Created {
        account_id: AccountId,
        body: WalletBalanceBody,
    },
    Updated {
        account_id: AccountId,
        body: WalletBalanceBody,
    },
    Deleted {
        account_id: AccountId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletBalanceBody {
    pub credit: u32,
    pub points: u32,
    pub prepaid: u32,
}

impl From<&Wallet> for WalletBalanceBody {
    fn from(wallet: &Wallet) -> Self {
        Self {
            credit: wallet.credit,
            points: wallet.points,
            prepaid: wallet.prepaid,
        }
    }
}
