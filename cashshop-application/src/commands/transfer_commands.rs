// Move-from-cash-inventory saga.
//
// Requested: the item is located and reserved under a fresh transaction id,
// then MOVE_CASH_ITEM is sent. InFlight: the reservation blocks every other
// claim until a callback arrives or the reservation expires. Completed and
// Failed are driven by the character compartment service's status events.

use tracing::{info, warn};

use cashshop_domain::messages::{
    CashItemMovedBody, CashShopStatusEvent, CharacterCompartmentCommand, MoveCashItemBody, Topic,
};
use cashshop_domain::{
    CashId, CharacterId, CompartmentId, CompartmentType, Correlation, ErrorCode, InventoryType,
    ItemId, TransactionId,
};

use crate::commands::{emit_cash_shop_error, report_failure, settle};
use crate::stores::{asset_store, compartment_store};
use crate::{AppState, MessageBuffer, WorkflowError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    pub character_id: CharacterId,
    pub serial_number: CashId,
    pub inventory_type: u8,
    pub slot: i16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferStarted {
    pub item_id: ItemId,
    pub transaction_id: TransactionId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveCompletion {
    pub character_id: CharacterId,
    pub item_id: ItemId,
    pub compartment_id: CompartmentId,
    pub slot: i16,
    pub transaction_id: Option<TransactionId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackOutcome {
    Applied,
    Dropped,
}

pub async fn move_from_cash_inventory(
    state: &AppState,
    request: MoveRequest,
) -> Result<TransferStarted, WorkflowError> {
    let result = begin_transfer(state, &request).await;
    match result {
        Ok(started) => {
            state.metrics.record_transfer_started();
            info!(
                "character {} moving item {} to inventory, transaction {}",
                request.character_id, started.item_id, started.transaction_id
            );
            Ok(started)
        }
        Err(err) => {
            report_failure(state, request.character_id, "move from cash inventory", &err).await;
            Err(err)
        }
    }
}

async fn begin_transfer(
    state: &AppState,
    request: &MoveRequest,
) -> Result<TransferStarted, WorkflowError> {
    let inventory_type = InventoryType::try_from(request.inventory_type)
        .map_err(|err| WorkflowError::InvalidInventoryType(err.to_string()))?;
    let character = state
        .characters
        .character_by_id(request.character_id, false)
        .await?;
    let compartment_type = CompartmentType::for_job(character.job_id);

    let item_id = {
        let mut tx = state.store.begin().await?;
        let compartment = compartment_store::get_by_account_and_type(
            tx.as_mut(),
            character.account_id,
            compartment_type,
        )
        .await?
        .ok_or_else(|| {
            WorkflowError::CompartmentNotFound(format!(
                "{} compartment of account {}",
                compartment_type.as_str(),
                character.account_id
            ))
        })?;
        match compartment.find_by_cash_id(request.serial_number) {
            Some(view) => view.asset.item_id,
            None => {
                let partial = compartment.partial_assets();
                if partial > 0 || compartment.assets.is_partial() {
                    warn!(
                        "cash item {} not found but {} assets of compartment {} could not be joined",
                        request.serial_number, partial, compartment.compartment.id
                    );
                }
                return Err(WorkflowError::ItemNotFound(format!(
                    "cash item {}",
                    request.serial_number
                )));
            }
        }
    };

    if state.reservations.is_reserved(item_id) {
        return Err(WorkflowError::ItemAlreadyReserved(item_id));
    }
    let transaction_id = TransactionId::generate();
    if !state
        .reservations
        .reserve_for(item_id, request.character_id, transaction_id)
    {
        return Err(WorkflowError::ItemAlreadyReserved(item_id));
    }

    if let Err(err) = send_move(state, request, inventory_type, item_id, transaction_id).await {
        state.reservations.release(item_id);
        return Err(WorkflowError::Internal(err));
    }

    Ok(TransferStarted {
        item_id,
        transaction_id,
    })
}

async fn send_move(
    state: &AppState,
    request: &MoveRequest,
    inventory_type: InventoryType,
    item_id: ItemId,
    transaction_id: TransactionId,
) -> anyhow::Result<()> {
    let mut buffer = MessageBuffer::default();
    buffer.put(
        Topic::CharacterCompartmentCommand,
        request.character_id,
        &CharacterCompartmentCommand::MoveCashItem {
            character_id: request.character_id,
            inventory_type,
            body: MoveCashItemBody {
                slot: request.slot,
                cash_item_id: item_id,
                transaction_id,
            },
        },
    )?;
    buffer.flush(state.producer.as_ref()).await
}

/// The foreign inventory refused the item. Releases the claim and tells the
/// character.
pub async fn move_from_failed(
    state: &AppState,
    character_id: CharacterId,
    item_id: ItemId,
    transaction_id: Option<TransactionId>,
) -> Result<CallbackOutcome, WorkflowError> {
    match state.reservations.release_matching(item_id, transaction_id) {
        Correlation::Mismatched(live) => {
            warn!(
                "move failure for item {} belongs to transaction {:?}, live reservation is {:?}; dropped",
                item_id, transaction_id, live.transaction_id
            );
            state.metrics.record_callback_dropped();
            return Ok(CallbackOutcome::Dropped);
        }
        Correlation::Missing => {
            let mut tx = state.store.begin().await?;
            if tx.item_by_id(item_id).await?.is_none() {
                warn!(
                    "move failure for unknown item {} of character {}; dropped",
                    item_id, character_id
                );
                state.metrics.record_callback_dropped();
                return Ok(CallbackOutcome::Dropped);
            }
            warn!(
                "move failure for item {} arrived without a live reservation",
                item_id
            );
        }
        Correlation::Matched(_) => {}
    }

    state.metrics.record_transfer_failed();
    warn!(
        "moving item {} for character {} failed remotely",
        item_id, character_id
    );
    emit_cash_shop_error(state, character_id, ErrorCode::UnknownError).await;
    Ok(CallbackOutcome::Applied)
}

/// The foreign inventory adopted the item. The local asset goes away while the
/// item record stays as history.
pub async fn moved_from(
    state: &AppState,
    completion: MoveCompletion,
) -> Result<CallbackOutcome, WorkflowError> {
    let correlation = state
        .reservations
        .release_matching(completion.item_id, completion.transaction_id);
    if let Correlation::Mismatched(live) = correlation {
        warn!(
            "move completion for item {} belongs to transaction {:?}, live reservation is {:?}; dropped",
            completion.item_id, completion.transaction_id, live.transaction_id
        );
        state.metrics.record_callback_dropped();
        return Ok(CallbackOutcome::Dropped);
    }

    let mut buffer = MessageBuffer::default();
    let result = complete_transfer(state, &mut buffer, &completion).await;
    let outcome = settle(
        state,
        completion.character_id,
        "move completion",
        buffer,
        result,
    )
    .await?;
    match outcome {
        CallbackOutcome::Applied => {
            state.metrics.record_transfer_completed();
            info!(
                "item {} moved to compartment {} slot {}",
                completion.item_id, completion.compartment_id, completion.slot
            );
        }
        CallbackOutcome::Dropped => state.metrics.record_callback_dropped(),
    }
    Ok(outcome)
}

async fn complete_transfer(
    state: &AppState,
    buffer: &mut MessageBuffer,
    completion: &MoveCompletion,
) -> Result<CallbackOutcome, WorkflowError> {
    let mut tx = state.store.begin().await?;
    let removed = asset_store::delete_by_item(tx.as_mut(), completion.item_id).await?;
    if removed == 0 {
        warn!(
            "move completion for item {} matches no local asset; dropped",
            completion.item_id
        );
        return Ok(CallbackOutcome::Dropped);
    }
    buffer.put(
        Topic::CashShopStatus,
        completion.character_id,
        &CashShopStatusEvent::CashItemMovedToInventory {
            character_id: completion.character_id,
            body: CashItemMovedBody {
                compartment_id: completion.compartment_id,
                slot: completion.slot,
            },
        },
    )?;
    tx.commit().await?;
    Ok(CallbackOutcome::Applied)
}
