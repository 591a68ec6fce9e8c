use cashshop_domain::{AccountId, CompartmentId, CompartmentView};
use tracing::warn;

use crate::stores::compartment_store;
use crate::{AppError, AppState};

/// Compartments of an account with their assets and items joined. Joins that
/// could not be performed are tagged, never dropped.
pub async fn list_compartments(
    state: &AppState,
    account_id: AccountId,
) -> Result<Vec<CompartmentView>, AppError> {
    let mut tx = state.store.begin().await?;
    let views = compartment_store::list_by_account(tx.as_mut(), account_id).await?;
    let partial: usize = views.iter().map(CompartmentView::partial_assets).sum();
    if partial > 0 {
        warn!(
            "{} assets of account {} returned without their item",
            partial, account_id
        );
    }
    Ok(views)
}

pub async fn get_compartment(
    state: &AppState,
    compartment_id: CompartmentId,
) -> Result<Option<CompartmentView>, AppError> {
    let mut tx = state.store.begin().await?;
    Ok(compartment_store::get_by_id(tx.as_mut(), compartment_id).await?)
}
