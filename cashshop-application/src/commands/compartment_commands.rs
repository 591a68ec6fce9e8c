// Accept/Release handoff primitives. Another service's saga drives these
// against one of our compartments and correlates every answer by its
// transaction id.

use tracing::{error, info, warn};

use cashshop_domain::messages::{
    CashCompartmentStatusEvent, CompartmentErrorBody, CompartmentTransactionBody, Topic,
};
use cashshop_domain::{
    AccountId, Asset, CompartmentId, CompartmentType, ErrorCode, ItemId, TransactionId,
};

use crate::commands::flush_committed;
use crate::stores::asset_store;
use crate::{AppState, MessageBuffer, WorkflowError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handoff {
    pub account_id: AccountId,
    pub compartment_id: CompartmentId,
    pub compartment_type: CompartmentType,
    pub item_id: ItemId,
    pub transaction_id: TransactionId,
}

/// Adopts an item handed over by another service as a new asset.
pub async fn accept(state: &AppState, handoff: Handoff) -> Result<Asset, WorkflowError> {
    let mut buffer = MessageBuffer::default();
    let result = execute_accept(state, &mut buffer, &handoff).await;
    match result {
        Ok(asset) => {
            flush_committed(state, buffer).await;
            info!(
                "accepted item {} into compartment {} for transaction {}",
                handoff.item_id, handoff.compartment_id, handoff.transaction_id
            );
            Ok(asset)
        }
        Err(err) => {
            let code = match err {
                WorkflowError::CompartmentNotFound(_) => ErrorCode::UnknownError,
                _ => ErrorCode::AssetCreationFailed,
            };
            warn!(
                "accept of item {} for transaction {} failed: {}",
                handoff.item_id, handoff.transaction_id, err
            );
            emit_compartment_error(state, &handoff, code).await;
            Err(err)
        }
    }
}

async fn execute_accept(
    state: &AppState,
    buffer: &mut MessageBuffer,
    handoff: &Handoff,
) -> Result<Asset, WorkflowError> {
    let mut tx = state.store.begin().await?;
    if tx.compartment_by_id(handoff.compartment_id).await?.is_none() {
        return Err(WorkflowError::CompartmentNotFound(
            handoff.compartment_id.to_string(),
        ));
    }
    let asset = match asset_store::get_by_item(tx.as_mut(), handoff.item_id).await? {
        Some(existing) if existing.compartment_id == handoff.compartment_id => {
            info!(
                "item {} already sits in compartment {}, accepting again",
                handoff.item_id, handoff.compartment_id
            );
            existing
        }
        Some(existing) => {
            return Err(WorkflowError::AssetCreationFailed(format!(
                "item {} is already placed in compartment {}",
                handoff.item_id, existing.compartment_id
            )));
        }
        None => asset_store::create(tx.as_mut(), handoff.compartment_id, handoff.item_id)
            .await
            .map_err(|err| match err {
                WorkflowError::InventoryFull(_) => {
                    WorkflowError::AssetCreationFailed(err.to_string())
                }
                other => other,
            })?,
    };
    buffer.put(
        Topic::CashCompartmentStatus,
        handoff.account_id,
        &CashCompartmentStatusEvent::Accepted {
            account_id: handoff.account_id,
            compartment_id: handoff.compartment_id,
            compartment_type: handoff.compartment_type,
            body: CompartmentTransactionBody {
                transaction_id: handoff.transaction_id,
            },
        },
    )?;
    tx.commit().await?;
    Ok(asset)
}

/// Gives up the asset holding `item_id` so another service can adopt it.
pub async fn release(state: &AppState, handoff: Handoff) -> Result<Asset, WorkflowError> {
    let mut buffer = MessageBuffer::default();
    let result = execute_release(state, &mut buffer, &handoff).await;
    match result {
        Ok(asset) => {
            flush_committed(state, buffer).await;
            info!(
                "released item {} from compartment {} for transaction {}",
                handoff.item_id, handoff.compartment_id, handoff.transaction_id
            );
            Ok(asset)
        }
        Err(err) => {
            warn!(
                "release of item {} for transaction {} failed: {}",
                handoff.item_id, handoff.transaction_id, err
            );
            emit_compartment_error(state, &handoff, err.code()).await;
            Err(err)
        }
    }
}

async fn execute_release(
    state: &AppState,
    buffer: &mut MessageBuffer,
    handoff: &Handoff,
) -> Result<Asset, WorkflowError> {
    // An item in flight through the move saga belongs to that saga.
    if state.reservations.is_reserved(handoff.item_id) {
        return Err(WorkflowError::ItemAlreadyReserved(handoff.item_id));
    }

    let mut tx = state.store.begin().await?;
    if tx.compartment_by_id(handoff.compartment_id).await?.is_none() {
        return Err(WorkflowError::CompartmentNotFound(
            handoff.compartment_id.to_string(),
        ));
    }
    let asset = tx
        .assets_by_compartment(handoff.compartment_id)
        .await?
        .into_iter()
        .find(|asset| asset.item_id == handoff.item_id)
        .ok_or_else(|| {
            WorkflowError::ItemNotFound(format!(
                "item {} in compartment {}",
                handoff.item_id, handoff.compartment_id
            ))
        })?;
    asset_store::delete(tx.as_mut(), asset.id).await?;
    buffer.put(
        Topic::CashCompartmentStatus,
        handoff.account_id,
        &CashCompartmentStatusEvent::Released {
            account_id: handoff.account_id,
            compartment_id: handoff.compartment_id,
            compartment_type: handoff.compartment_type,
            body: CompartmentTransactionBody {
                transaction_id: handoff.transaction_id,
            },
        },
    )?;
    tx.commit().await?;
    Ok(asset)
}

async fn emit_compartment_error(state: &AppState, handoff: &Handoff, code: ErrorCode) {
    state.metrics.record_workflow_error();
    let mut buffer = MessageBuffer::default();
    let event = CashCompartmentStatusEvent::Error {
        account_id: handoff.account_id,
        compartment_id: handoff.compartment_id,
        compartment_type: handoff.compartment_type,
        body: CompartmentErrorBody {
            error_code: code,
            transaction_id: handoff.transaction_id,
        },
    };
    if let Err(err) = buffer.put(Topic::CashCompartmentStatus, handoff.account_id, &event) {
        error!("unable to encode compartment error: {}", err);
        return;
    }
    if let Err(err) = buffer.flush(state.producer.as_ref()).await {
        error!(
            "unable to publish {} for transaction {}: {}",
            code.as_str(),
            handoff.transaction_id,
            err
        );
    }
}
