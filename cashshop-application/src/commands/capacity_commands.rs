use tracing::info;

use cashshop_domain::messages::{
    CapacityIncreasedBody, CashShopStatusEvent, CharacterCompartmentCommand, IncreaseCapacityBody,
    Topic,
};
use cashshop_domain::{
    CharacterId, InventoryType, LookupError, SerialNumber, Wallet, MAX_INVENTORY_SLOTS,
};

use crate::commands::{resolve_currency, settle};
use crate::stores::wallet_ledger;
use crate::{AppState, MessageBuffer, WorkflowError};

pub const INCREASE_BY_TYPE_COST: u32 = 4_000;
pub const INCREASE_BY_TYPE_AMOUNT: u32 = 8;
pub const INCREASE_BY_ITEM_AMOUNT: u32 = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityIncrease {
    pub inventory_type: InventoryType,
    pub capacity: u32,
    pub amount: u32,
    pub wallet: Wallet,
}

pub async fn increase_capacity_by_type(
    state: &AppState,
    character_id: CharacterId,
    currency: u32,
    inventory_type: u8,
) -> Result<CapacityIncrease, WorkflowError> {
    let mut buffer = MessageBuffer::default();
    let result = match InventoryType::try_from(inventory_type) {
        Ok(inventory_type) => {
            execute_increase(
                state,
                &mut buffer,
                character_id,
                currency,
                inventory_type,
                INCREASE_BY_TYPE_COST,
                INCREASE_BY_TYPE_AMOUNT,
            )
            .await
        }
        Err(err) => Err(WorkflowError::InvalidInventoryType(err.to_string())),
    };
    finish(state, character_id, buffer, result).await
}

/// Slot coupons bought from the catalog: the coupon's template id names the
/// inventory, its catalog price is the cost.
pub async fn increase_capacity_by_item(
    state: &AppState,
    character_id: CharacterId,
    currency: u32,
    serial_number: SerialNumber,
) -> Result<CapacityIncrease, WorkflowError> {
    let mut buffer = MessageBuffer::default();
    let result = async {
        let commodity = state.catalog.commodity_by_serial(serial_number).await?;
        let inventory_type = InventoryType::for_slot_coupon(commodity.template_id.0)
            .map_err(|err| WorkflowError::InvalidInventoryType(err.to_string()))?;
        execute_increase(
            state,
            &mut buffer,
            character_id,
            currency,
            inventory_type,
            commodity.price,
            INCREASE_BY_ITEM_AMOUNT,
        )
        .await
    }
    .await;
    finish(state, character_id, buffer, result).await
}

async fn finish(
    state: &AppState,
    character_id: CharacterId,
    buffer: MessageBuffer,
    result: Result<CapacityIncrease, WorkflowError>,
) -> Result<CapacityIncrease, WorkflowError> {
    let increase = settle(state, character_id, "capacity increase", buffer, result).await?;
    state.metrics.record_capacity_increase();
    info!(
        "character {} raised {} capacity to {}",
        character_id,
        increase.inventory_type.as_str(),
        increase.capacity
    );
    Ok(increase)
}

async fn execute_increase(
    state: &AppState,
    buffer: &mut MessageBuffer,
    character_id: CharacterId,
    currency: u32,
    inventory_type: InventoryType,
    cost: u32,
    amount: u32,
) -> Result<CapacityIncrease, WorkflowError> {
    let currency = resolve_currency(character_id, currency)?;
    let character = state.characters.character_by_id(character_id, true).await?;

    let mut tx = state.store.begin().await?;
    let wallet = wallet_ledger::get_by_account(tx.as_mut(), character.account_id).await?;
    wallet_ledger::ensure_affordable(&wallet, currency, cost)?;

    let current = character
        .inventory
        .as_ref()
        .and_then(|inventory| inventory.capacity(inventory_type))
        .ok_or_else(|| {
            LookupError::NotFound(format!(
                "{} inventory of character {}",
                inventory_type.as_str(),
                character_id
            ))
        })?;
    let capacity = current
        .checked_add(amount)
        .filter(|capacity| *capacity <= MAX_INVENTORY_SLOTS)
        .ok_or(WorkflowError::MaxSlots {
            capacity: current,
            amount,
        })?;

    let wallet =
        wallet_ledger::debit(tx.as_mut(), buffer, character.account_id, currency, cost).await?;
    buffer.put(
        Topic::CharacterCompartmentCommand,
        character_id,
        &CharacterCompartmentCommand::IncreaseCapacity {
            character_id,
            inventory_type,
            body: IncreaseCapacityBody { amount },
        },
    )?;
    buffer.put(
        Topic::CashShopStatus,
        character_id,
        &CashShopStatusEvent::InventoryCapacityIncreased {
            character_id,
            body: CapacityIncreasedBody {
                inventory_type,
                capacity,
                amount,
            },
        },
    )?;

    tx.commit().await?;
    Ok(CapacityIncrease {
        inventory_type,
        capacity,
        amount,
        wallet,
    })
}
