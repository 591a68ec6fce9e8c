// Account lifecycle: every account owns one wallet and one compartment per
// class-line for as long as it exists.

use tracing::{error, info};

use cashshop_domain::AccountId;

use crate::commands::flush_committed;
use crate::stores::{compartment_store, wallet_ledger};
use crate::{AppState, MessageBuffer, WorkflowError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountSetup {
    Created,
    AlreadyExists,
}

pub async fn account_created(
    state: &AppState,
    account_id: AccountId,
) -> Result<AccountSetup, WorkflowError> {
    let mut buffer = MessageBuffer::default();
    let result = create_account_holdings(state, &mut buffer, account_id).await;
    match result {
        Ok(AccountSetup::Created) => {
            flush_committed(state, buffer).await;
            info!("created wallet and cash inventory for account {}", account_id);
            Ok(AccountSetup::Created)
        }
        Ok(AccountSetup::AlreadyExists) => {
            info!("account {} already has a wallet, skipping setup", account_id);
            Ok(AccountSetup::AlreadyExists)
        }
        Err(err) => {
            state.metrics.record_workflow_error();
            error!("setting up account {} failed: {:?}", account_id, err);
            Err(err)
        }
    }
}

async fn create_account_holdings(
    state: &AppState,
    buffer: &mut MessageBuffer,
    account_id: AccountId,
) -> Result<AccountSetup, WorkflowError> {
    let mut tx = state.store.begin().await?;
    if tx.wallet_by_account(account_id).await?.is_some() {
        return Ok(AccountSetup::AlreadyExists);
    }
    wallet_ledger::create(tx.as_mut(), buffer, account_id, 0, 0, 0).await?;
    compartment_store::create_inventory(
        tx.as_mut(),
        buffer,
        account_id,
        state.config.default_compartment_capacity,
    )
    .await?;
    tx.commit().await?;
    Ok(AccountSetup::Created)
}

/// Removes the wallet and every compartment with its assets. Items stay.
pub async fn account_deleted(state: &AppState, account_id: AccountId) -> Result<(), WorkflowError> {
    let mut buffer = MessageBuffer::default();
    let result = delete_account_holdings(state, &mut buffer, account_id).await;
    match result {
        Ok(compartments) => {
            flush_committed(state, buffer).await;
            info!(
                "deleted wallet and {} compartments of account {}",
                compartments, account_id
            );
            Ok(())
        }
        Err(err) => {
            state.metrics.record_workflow_error();
            error!("deleting account {} failed: {:?}", account_id, err);
            Err(err)
        }
    }
}

async fn delete_account_holdings(
    state: &AppState,
    buffer: &mut MessageBuffer,
    account_id: AccountId,
) -> Result<usize, WorkflowError> {
    let mut tx = state.store.begin().await?;
    wallet_ledger::delete(tx.as_mut(), buffer, account_id).await?;
    let deleted = compartment_store::delete_inventory(tx.as_mut(), buffer, account_id).await?;
    tx.commit().await?;
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cashshop_domain::messages::{
        CashCompartmentStatusEvent, CashInventoryStatusEvent, Message, Topic, WalletStatusEvent,
    };
    use cashshop_domain::ports::Store;
    use cashshop_domain::{CompartmentType, Wallet};
    use cashshop_infrastructure::FaultPoint;

    use crate::queries::{compartment_queries, wallet_queries};
    use crate::test_support::Harness;

    fn decode_all<T: serde::de::DeserializeOwned>(messages: Vec<Message>) -> Vec<T> {
        messages
            .iter()
            .map(|message| message.decode().expect("event"))
            .collect()
    }

    #[tokio::test]
    async fn created_account_gets_empty_wallet_and_three_compartments() {
        let harness = Harness::new();
        let setup = account_created(&harness.state, AccountId(7))
            .await
            .expect("created");
        assert_eq!(setup, AccountSetup::Created);

        let wallet = wallet_queries::get_wallet(&harness.state, AccountId(7))
            .await
            .expect("wallet")
            .expect("present");
        assert_eq!(wallet, Wallet::empty(AccountId(7)));

        let compartments = compartment_queries::list_compartments(&harness.state, AccountId(7))
            .await
            .expect("compartments");
        let mut types: Vec<CompartmentType> = compartments
            .iter()
            .map(|view| view.compartment.compartment_type)
            .collect();
        types.sort_by_key(|compartment_type| compartment_type.code());
        assert_eq!(types, CompartmentType::ALL.to_vec());
        assert!(compartments.iter().all(|view| view.compartment.capacity == 55));

        let wallet_events: Vec<WalletStatusEvent> =
            decode_all(harness.published(Topic::WalletStatus));
        assert_eq!(wallet_events.len(), 1);
        let compartment_events: Vec<CashCompartmentStatusEvent> =
            decode_all(harness.published(Topic::CashCompartmentStatus));
        assert_eq!(compartment_events.len(), 3);
        let inventory_events: Vec<CashInventoryStatusEvent> =
            decode_all(harness.published(Topic::CashInventoryStatus));
        assert_eq!(
            inventory_events,
            vec![CashInventoryStatusEvent::Created {
                account_id: AccountId(7)
            }]
        );
    }

    #[tokio::test]
    async fn redelivered_creation_is_a_no_op() {
        let harness = Harness::new();
        account_created(&harness.state, AccountId(7))
            .await
            .expect("created");
        harness.bus.clear();

        let setup = account_created(&harness.state, AccountId(7))
            .await
            .expect("redelivered");
        assert_eq!(setup, AccountSetup::AlreadyExists);
        assert!(harness.published(Topic::WalletStatus).is_empty());
        assert_eq!(
            compartment_queries::list_compartments(&harness.state, AccountId(7))
                .await
                .expect("compartments")
                .len(),
            3
        );
    }

    #[tokio::test]
    async fn failed_setup_leaves_nothing_behind() {
        let harness = Harness::new();
        harness.store.fail_on(FaultPoint::Commit);

        account_created(&harness.state, AccountId(7))
            .await
            .expect_err("commit fails");
        harness.store.clear_faults();

        let mut tx = harness.store.begin().await.expect("begin");
        assert!(tx
            .wallet_by_account(AccountId(7))
            .await
            .expect("read")
            .is_none());
        assert!(tx
            .compartments_by_account(AccountId(7))
            .await
            .expect("read")
            .is_empty());
        assert!(harness.published(Topic::WalletStatus).is_empty());
    }

    #[tokio::test]
    async fn deleted_account_loses_wallet_and_compartments() {
        let harness = Harness::new();
        account_created(&harness.state, AccountId(7))
            .await
            .expect("created");
        harness.bus.clear();

        account_deleted(&harness.state, AccountId(7))
            .await
            .expect("deleted");
        assert!(wallet_queries::get_wallet(&harness.state, AccountId(7))
            .await
            .expect("wallet")
            .is_none());
        assert!(compartment_queries::list_compartments(&harness.state, AccountId(7))
            .await
            .expect("compartments")
            .is_empty());
        let wallet_events: Vec<WalletStatusEvent> =
            decode_all(harness.published(Topic::WalletStatus));
        assert_eq!(
            wallet_events,
            vec![WalletStatusEvent::Deleted {
                account_id: AccountId(7)
            }]
        );
        let inventory_events: Vec<CashInventoryStatusEvent> =
            decode_all(harness.published(Topic::CashInventoryStatus));
        assert_eq!(
            inventory_events,
            vec![CashInventoryStatusEvent::Deleted {
                account_id: AccountId(7)
            }]
        );
    }
}
