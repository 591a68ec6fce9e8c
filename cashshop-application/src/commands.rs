// Orchestrated workflows. Each entry point opens its own transaction, buffers
// events while mutating, commits, and only then flushes. Failures are answered
// with an ERROR status event to the requesting character.

pub mod account_commands;
pub mod capacity_commands;
pub mod compartment_commands;
pub mod item_commands;
pub mod purchase_commands;
pub mod transfer_commands;

use cashshop_domain::messages::{CashShopStatusEvent, Topic};
use cashshop_domain::{CharacterId, Currency, ErrorCode};
use tracing::{error, warn};

use crate::{AppState, MessageBuffer, WorkflowError};

pub(crate) fn resolve_currency(
    character_id: CharacterId,
    code: u32,
) -> Result<Currency, WorkflowError> {
    Currency::try_from(code).map_err(|err| {
        warn!(
            "character {} sent currency code {} which matches no wallet lane",
            character_id, code
        );
        WorkflowError::from(err)
    })
}

/// Flushes a buffer whose transaction already committed. The state change is
/// durable at this point, so a transport failure is logged, not returned.
pub(crate) async fn flush_committed(state: &AppState, buffer: MessageBuffer) {
    if buffer.is_empty() {
        return;
    }
    if let Err(err) = buffer.flush(state.producer.as_ref()).await {
        error!("committed events could not be published: {}", err);
    }
}

pub(crate) async fn emit_cash_shop_error(
    state: &AppState,
    character_id: CharacterId,
    code: ErrorCode,
) {
    let mut buffer = MessageBuffer::default();
    let event = CashShopStatusEvent::error(character_id, code);
    if let Err(err) = buffer.put(Topic::CashShopStatus, character_id, &event) {
        error!("unable to encode error event for character {}: {}", character_id, err);
        return;
    }
    if let Err(err) = buffer.flush(state.producer.as_ref()).await {
        error!(
            "unable to publish {} to character {}: {}",
            code.as_str(),
            character_id,
            err
        );
    }
}

/// Logs the failure and answers the character with its error code.
pub(crate) async fn report_failure(
    state: &AppState,
    character_id: CharacterId,
    workflow: &str,
    err: &WorkflowError,
) {
    state.metrics.record_workflow_error();
    if err.is_business() {
        warn!("{} for character {} rejected: {}", workflow, character_id, err);
    } else {
        error!("{} for character {} failed: {:?}", workflow, character_id, err);
    }
    emit_cash_shop_error(state, character_id, err.code()).await;
}

/// Finishes a workflow: flush on success, error event on failure.
pub(crate) async fn settle<T>(
    state: &AppState,
    character_id: CharacterId,
    workflow: &str,
    buffer: MessageBuffer,
    result: Result<T, WorkflowError>,
) -> Result<T, WorkflowError> {
    match result {
        Ok(value) => {
            flush_committed(state, buffer).await;
            Ok(value)
        }
        Err(err) => {
            report_failure(state, character_id, workflow, &err).await;
            Err(err)
        }
    }
}
