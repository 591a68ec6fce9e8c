use tokio::sync::{broadcast, watch};
use tracing::{debug, error, info, warn};

use cashshop_application::AppState;
use cashshop_domain::messages::{Message, Topic};

use crate::error::ConsumerError;
use crate::handlers::{
    handle_account_status, handle_cash_compartment_command, handle_cash_item_command,
    handle_cash_shop_command, handle_compartment_status, Handled,
};

/// Topics this service consumes.
pub const INBOUND_TOPICS: [Topic; 5] = [
    Topic::AccountStatus,
    Topic::CashShopCommand,
    Topic::CashCompartmentCommand,
    Topic::CashItemCommand,
    Topic::CharacterCompartmentStatus,
];

pub async fn dispatch(
    state: &AppState,
    topic: Topic,
    message: &Message,
) -> Result<Handled, ConsumerError> {
    match topic {
        Topic::AccountStatus => handle_account_status(state, message).await,
        Topic::CashShopCommand => handle_cash_shop_command(state, message).await,
        Topic::CashCompartmentCommand => handle_cash_compartment_command(state, message).await,
        Topic::CashItemCommand => handle_cash_item_command(state, message).await,
        Topic::CharacterCompartmentStatus => handle_compartment_status(state, message).await,
        other => {
            debug!("no handler for {}", other);
            Ok(Handled::Ignored)
        }
    }
}

/// Handles messages of one topic in arrival order until shutdown flips or the
/// channel closes. A failing message is logged and skipped.
pub async fn run_consumer(
    state: AppState,
    topic: Topic,
    mut receiver: broadcast::Receiver<Message>,
    mut shutdown: watch::Receiver<bool>,
) {
    info!("consuming {}", topic);
    loop {
        tokio::select! {
            received = receiver.recv() => match received {
                Ok(message) => match dispatch(&state, topic, &message).await {
                    Ok(Handled::Applied) => debug!("{} key {} applied", topic, message.key),
                    Ok(Handled::Ignored) => debug!("{} key {} ignored", topic, message.key),
                    Err(ConsumerError::Rejected(reason)) => {
                        debug!("{} key {} rejected: {}", topic, message.key, reason)
                    }
                    Err(ConsumerError::Malformed(reason)) => {
                        warn!("{} key {} skipped: {}", topic, message.key, reason)
                    }
                    Err(err) => error!("{} key {} failed: {}", topic, message.key, err),
                },
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("{} consumer lagged, {} messages lost", topic, skipped);
                }
                Err(broadcast::error::RecvError::Closed) => {
                    info!("{} channel closed", topic);
                    return;
                }
            },
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    info!("{} consumer stopping", topic);
                    return;
                }
            }
        }
    }
}
