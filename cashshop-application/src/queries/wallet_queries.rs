use cashshop_domain::{AccountId, Wallet};

use crate::{AppError, AppState};

pub async fn get_wallet(state: &AppState, account_id: AccountId) -> Result<Option<Wallet>, AppError> {
    let mut tx = state.store.begin().await?;
    Ok(tx.wallet_by_account(account_id).await?)
}
