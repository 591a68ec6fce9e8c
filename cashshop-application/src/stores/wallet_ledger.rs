use cashshop_domain::messages::{Topic, WalletBalanceBody, WalletStatusEvent};
use cashshop_domain::ports::StoreTransaction;
use cashshop_domain::{AccountId, Currency, Wallet};

use crate::{MessageBuffer, WorkflowError};

pub async fn get_by_account(
    tx: &mut dyn StoreTransaction,
    account_id: AccountId,
) -> Result<Wallet, WorkflowError> {
    tx.wallet_by_account(account_id)
        .await?
        .ok_or(WorkflowError::WalletNotFound(account_id))
}

pub async fn create(
    tx: &mut dyn StoreTransaction,
    buffer: &mut MessageBuffer,
    account_id: AccountId,
    credit: u32,
    points: u32,
    prepaid: u32,
) -> Result<Wallet, WorkflowError> {
    let wallet = Wallet::new(account_id, credit, points, prepaid);
    tx.insert_wallet(&wallet).await?;
    buffer.put(
        Topic::WalletStatus,
        account_id,
        &WalletStatusEvent::Created {
            account_id,
            body: WalletBalanceBody::from(&wallet),
        },
    )?;
    Ok(wallet)
}

/// Replaces all three balances.
pub async fn update(
    tx: &mut dyn StoreTransaction,
    buffer: &mut MessageBuffer,
    wallet: Wallet,
) -> Result<Wallet, WorkflowError> {
    if !tx.update_wallet(&wallet).await? {
        return Err(WorkflowError::WalletNotFound(wallet.account_id));
    }
    buffer.put(
        Topic::WalletStatus,
        wallet.account_id,
        &WalletStatusEvent::Updated {
            account_id: wallet.account_id,
            body: WalletBalanceBody::from(&wallet),
        },
    )?;
    Ok(wallet)
}

pub async fn delete(
    tx: &mut dyn StoreTransaction,
    buffer: &mut MessageBuffer,
    account_id: AccountId,
) -> Result<bool, WorkflowError> {
    let deleted = tx.delete_wallet(account_id).await?;
    if deleted {
        buffer.put(
            Topic::WalletStatus,
            account_id,
            &WalletStatusEvent::Deleted { account_id },
        )?;
    }
    Ok(deleted)
}

/// Takes `amount` from one lane, refusing before any write when the lane
/// cannot cover it.
pub async fn debit(
    tx: &mut dyn StoreTransaction,
    buffer: &mut MessageBuffer,
    account_id: AccountId,
    currency: Currency,
    amount: u32,
) -> Result<Wallet, WorkflowError> {
    let wallet = get_by_account(tx, account_id).await?;
    ensure_affordable(&wallet, currency, amount)?;
    update(tx, buffer, wallet.purchase(currency, amount)).await
}

pub fn ensure_affordable(wallet: &Wallet, currency: Currency, price: u32) -> Result<(), WorkflowError> {
    if wallet.can_afford(currency, price) {
        return Ok(());
    }
    Err(WorkflowError::InsufficientFunds {
        currency,
        balance: wallet.balance(currency),
        price,
    })
}
