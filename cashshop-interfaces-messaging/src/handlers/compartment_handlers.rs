use tracing::warn;

use cashshop_application::commands::compartment_commands::{self, Handoff};
use cashshop_application::{AppError, AppState};
use cashshop_domain::messages::{CashCompartmentCommand, Message, Topic};

use crate::error::ConsumerError;
use crate::handlers::{decode, Handled};

pub async fn handle_cash_compartment_command(
    state: &AppState,
    message: &Message,
) -> Result<Handled, ConsumerError> {
    let command: CashCompartmentCommand = decode(Topic::CashCompartmentCommand, message)?;
    match command {
        CashCompartmentCommand::Accept {
            account_id,
            compartment_type,
            body,
        } => {
            let handoff = Handoff {
                account_id,
                compartment_id: body.compartment_id,
                compartment_type,
                item_id: body.item_id,
                transaction_id: body.transaction_id,
            };
            compartment_commands::accept(state, handoff)
                .await
                .map_err(AppError::from)?;
        }
        CashCompartmentCommand::Release {
            account_id,
            compartment_type,
            body,
        } => {
            let handoff = Handoff {
                account_id,
                compartment_id: body.compartment_id,
                compartment_type,
                item_id: body.item_id,
                transaction_id: body.transaction_id,
            };
            compartment_commands::release(state, handoff)
                .await
                .map_err(AppError::from)?;
        }
        CashCompartmentCommand::Unsupported => {
            warn!("unsupported cash compartment command, key {}", message.key);
            return Ok(Handled::Ignored);
        }
    }
    Ok(Handled::Applied)
}
