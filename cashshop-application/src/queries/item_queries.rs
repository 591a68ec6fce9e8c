use cashshop_domain::{Item, ItemId};

use crate::stores::item_store;
use crate::{AppError, AppState, WorkflowError};

pub async fn get_item(state: &AppState, item_id: ItemId) -> Result<Option<Item>, AppError> {
    let mut tx = state.store.begin().await?;
    match item_store::get_by_id(tx.as_mut(), item_id).await {
        Ok(item) => Ok(Some(item)),
        Err(WorkflowError::ItemNotFound(_)) => Ok(None),
        Err(err) => Err(err.into()),
    }
}
