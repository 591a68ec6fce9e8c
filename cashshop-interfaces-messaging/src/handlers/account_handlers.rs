use tracing::debug;

use cashshop_application::commands::account_commands;
use cashshop_application::{AppError, AppState};
use cashshop_domain::messages::{AccountStatus, AccountStatusEvent, Message, Topic};

use crate::error::ConsumerError;
use crate::handlers::{decode, Handled};

pub async fn handle_account_status(
    state: &AppState,
    message: &Message,
) -> Result<Handled, ConsumerError> {
    let event: AccountStatusEvent = decode(Topic::AccountStatus, message)?;
    match event.status {
        AccountStatus::Created => {
            account_commands::account_created(state, event.account_id)
                .await
                .map_err(AppError::from)?;
            Ok(Handled::Applied)
        }
        AccountStatus::Deleted => {
            account_commands::account_deleted(state, event.account_id)
                .await
                .map_err(AppError::from)?;
            Ok(Handled::Applied)
        }
        AccountStatus::Other => {
            debug!("ignoring account status for account {}", event.account_id);
            Ok(Handled::Ignored)
        }
    }
}
