use tracing::{info, warn};

use cashshop_domain::messages::{CashShopStatusEvent, PurchaseBody, Topic};
use cashshop_domain::{
    AssetId, CharacterId, CompartmentId, CompartmentType, ErrorCode, ItemId, SerialNumber,
    TemplateId, Wallet,
};

use crate::commands::{emit_cash_shop_error, flush_committed, report_failure, resolve_currency};
use crate::stores::item_store::{self, ItemSpec};
use crate::stores::{asset_store, compartment_store, wallet_ledger};
use crate::{AppState, MessageBuffer, WorkflowError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseRequest {
    pub character_id: CharacterId,
    pub currency: u32,
    pub serial_number: SerialNumber,
    /// Duplicate deliveries carrying the same key are acknowledged without effect.
    pub idempotency_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseReceipt {
    pub template_id: TemplateId,
    pub price: u32,
    pub compartment_id: CompartmentId,
    pub asset_id: AssetId,
    pub item_id: ItemId,
    pub wallet: Wallet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    InventoryFull,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseOutcome {
    Completed(PurchaseReceipt),
    Rejected(Rejection),
    Duplicate,
}

pub async fn purchase(
    state: &AppState,
    request: PurchaseRequest,
) -> Result<PurchaseOutcome, WorkflowError> {
    let mut buffer = MessageBuffer::default();
    let result = execute_purchase(state, &mut buffer, &request).await;
    match result {
        Ok(PurchaseOutcome::Completed(receipt)) => {
            flush_committed(state, buffer).await;
            state.metrics.record_purchase();
            info!(
                "character {} purchased template {} for {}",
                request.character_id, receipt.template_id, receipt.price
            );
            Ok(PurchaseOutcome::Completed(receipt))
        }
        Ok(PurchaseOutcome::Rejected(Rejection::InventoryFull)) => {
            state.metrics.record_purchase_rejection();
            warn!(
                "purchase of {} by character {} rejected: compartment full",
                request.serial_number, request.character_id
            );
            emit_cash_shop_error(state, request.character_id, ErrorCode::InventoryFull).await;
            Ok(PurchaseOutcome::Rejected(Rejection::InventoryFull))
        }
        Ok(PurchaseOutcome::Duplicate) => {
            state.metrics.record_duplicate_command();
            info!(
                "purchase {:?} by character {} already applied",
                request.idempotency_key, request.character_id
            );
            Ok(PurchaseOutcome::Duplicate)
        }
        Err(err) => {
            report_failure(state, request.character_id, "purchase", &err).await;
            Err(err)
        }
    }
}

async fn execute_purchase(
    state: &AppState,
    buffer: &mut MessageBuffer,
    request: &PurchaseRequest,
) -> Result<PurchaseOutcome, WorkflowError> {
    let currency = resolve_currency(request.character_id, request.currency)?;
    let commodity = state
        .catalog
        .commodity_by_serial(request.serial_number)
        .await?;
    let character = state
        .characters
        .character_by_id(request.character_id, false)
        .await?;

    let mut tx = state.store.begin().await?;
    if let Some(key) = &request.idempotency_key {
        let scoped = format!("purchase:{}:{}", request.character_id, key);
        if !tx.claim_idempotency_key(&scoped).await? {
            return Ok(PurchaseOutcome::Duplicate);
        }
    }

    let wallet = wallet_ledger::get_by_account(tx.as_mut(), character.account_id).await?;
    wallet_ledger::ensure_affordable(&wallet, currency, commodity.price)?;

    let compartment_type = CompartmentType::for_job(character.job_id);
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
    match compartment.has_free_slot() {
        Some(true) => {}
        Some(false) => return Ok(PurchaseOutcome::Rejected(Rejection::InventoryFull)),
        None => {
            return Err(WorkflowError::Internal(anyhow::anyhow!(
                "occupancy of compartment {} could not be read",
                compartment.compartment.id
            )))
        }
    }

    let wallet = wallet_ledger::debit(
        tx.as_mut(),
        buffer,
        character.account_id,
        currency,
        commodity.price,
    )
    .await?;
    let item = item_store::create(
        tx.as_mut(),
        buffer,
        ItemSpec {
            template_id: commodity.template_id,
            quantity: 1,
            purchased_by: character.id,
            expiration_days: state.config.item_expiration_days,
        },
    )
    .await?;
    let asset = asset_store::create(tx.as_mut(), compartment.compartment.id, item.id).await?;

    let receipt = PurchaseReceipt {
        template_id: commodity.template_id,
        price: commodity.price,
        compartment_id: compartment.compartment.id,
        asset_id: asset.id,
        item_id: item.id,
        wallet,
    };
    buffer.put(
        Topic::CashShopStatus,
        character.id,
        &CashShopStatusEvent::Purchase {
            character_id: character.id,
            body: PurchaseBody {
                template_id: receipt.template_id,
                price: receipt.price,
                compartment_id: receipt.compartment_id,
                asset_id: receipt.asset_id,
                item_id: receipt.item_id,
            },
        },
    )?;

    tx.commit().await?;
    Ok(PurchaseOutcome::Completed(receipt))
}
