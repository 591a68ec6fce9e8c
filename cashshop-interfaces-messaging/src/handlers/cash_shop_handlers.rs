use tracing::{debug, warn};

use cashshop_application::commands::capacity_commands;
use cashshop_application::commands::purchase_commands::{self, PurchaseRequest};
use cashshop_application::commands::transfer_commands::{self, MoveRequest};
use cashshop_application::{AppError, AppState};
use cashshop_domain::messages::{CashShopCommand, Message, Topic};

use crate::error::ConsumerError;
use crate::handlers::{decode, Handled};

pub async fn handle_cash_shop_command(
    state: &AppState,
    message: &Message,
) -> Result<Handled, ConsumerError> {
    let command: CashShopCommand = decode(Topic::CashShopCommand, message)?;
    match command {
        CashShopCommand::Purchase { character_id, body } => {
            purchase_commands::purchase(
                state,
                PurchaseRequest {
                    character_id,
                    currency: body.currency,
                    serial_number: body.serial_number,
                    idempotency_key: body.idempotency_key,
                },
            )
            .await
            .map_err(AppError::from)?;
        }
        CashShopCommand::RequestInventoryIncreaseByType { character_id, body } => {
            capacity_commands::increase_capacity_by_type(
                state,
                character_id,
                body.currency,
                body.inventory_type,
            )
            .await
            .map_err(AppError::from)?;
        }
        CashShopCommand::RequestInventoryIncreaseByItem { character_id, body } => {
            capacity_commands::increase_capacity_by_item(
                state,
                character_id,
                body.currency,
                body.serial_number,
            )
            .await
            .map_err(AppError::from)?;
        }
        CashShopCommand::MoveFromCashInventory { character_id, body } => {
            transfer_commands::move_from_cash_inventory(
                state,
                MoveRequest {
                    character_id,
                    serial_number: body.serial_number,
                    inventory_type: body.inventory_type,
                    slot: body.slot,
                },
            )
            .await
            .map_err(AppError::from)?;
        }
        CashShopCommand::Unsupported => {
            warn!("unsupported cash shop command, key {}", message.key);
            return Ok(Handled::Ignored);
        }
    }
    debug!("cash shop command for key {} handled", message.key);
    Ok(Handled::Applied)
}
