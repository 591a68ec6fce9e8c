// Compartment store API. Workflows use the inventory-level helpers;
// `update_capacity` and `delete` cover single compartments.

use cashshop_domain::messages::{
    CashCompartmentStatusEvent, CashInventoryStatusEvent, CompartmentCapacityBody, Topic,
};
use cashshop_domain::ports::StoreTransaction;
use cashshop_domain::{
    AccountId, Compartment, CompartmentId, CompartmentType, CompartmentView, Decoration,
};
use tracing::warn;

use crate::stores::asset_store;
use crate::{MessageBuffer, WorkflowError};

pub async fn get_by_id(
    tx: &mut dyn StoreTransaction,
    compartment_id: CompartmentId,
) -> Result<Option<CompartmentView>, WorkflowError> {
    match tx.compartment_by_id(compartment_id).await? {
        Some(compartment) => Ok(Some(decorate(tx, compartment).await)),
        None => Ok(None),
    }
}

pub async fn get_by_account_and_type(
    tx: &mut dyn StoreTransaction,
    account_id: AccountId,
    compartment_type: CompartmentType,
) -> Result<Option<CompartmentView>, WorkflowError> {
    match tx
        .compartment_by_account_and_type(account_id, compartment_type)
        .await?
    {
        Some(compartment) => Ok(Some(decorate(tx, compartment).await)),
        None => Ok(None),
    }
}

pub async fn list_by_account(
    tx: &mut dyn StoreTransaction,
    account_id: AccountId,
) -> Result<Vec<CompartmentView>, WorkflowError> {
    let compartments = tx.compartments_by_account(account_id).await?;
    let mut views = Vec::with_capacity(compartments.len());
    for compartment in compartments {
        views.push(decorate(tx, compartment).await);
    }
    Ok(views)
}

pub async fn create(
    tx: &mut dyn StoreTransaction,
    buffer: &mut MessageBuffer,
    account_id: AccountId,
    compartment_type: CompartmentType,
    capacity: u32,
) -> Result<Compartment, WorkflowError> {
    let compartment = Compartment::new(account_id, compartment_type, capacity);
    tx.insert_compartment(&compartment).await?;
    buffer.put(
        Topic::CashCompartmentStatus,
        account_id,
        &CashCompartmentStatusEvent::Created {
            account_id,
            compartment_id: compartment.id,
            compartment_type,
            body: CompartmentCapacityBody { capacity },
        },
    )?;
    Ok(compartment)
}

pub async fn update_capacity(
    tx: &mut dyn StoreTransaction,
    buffer: &mut MessageBuffer,
    compartment_id: CompartmentId,
    capacity: u32,
) -> Result<Compartment, WorkflowError> {
    let compartment = tx
        .update_compartment_capacity(compartment_id, capacity)
        .await?
        .ok_or_else(|| WorkflowError::CompartmentNotFound(compartment_id.to_string()))?;
    buffer.put(
        Topic::CashCompartmentStatus,
        compartment.account_id,
        &CashCompartmentStatusEvent::Updated {
            account_id: compartment.account_id,
            compartment_id,
            compartment_type: compartment.compartment_type,
            body: CompartmentCapacityBody { capacity },
        },
    )?;
    Ok(compartment)
}

/// Deletes the compartment together with every asset placed in it.
pub async fn delete(
    tx: &mut dyn StoreTransaction,
    buffer: &mut MessageBuffer,
    compartment_id: CompartmentId,
) -> Result<bool, WorkflowError> {
    let Some(compartment) = tx.compartment_by_id(compartment_id).await? else {
        return Ok(false);
    };
    delete_loaded(tx, buffer, &compartment).await?;
    Ok(true)
}

pub async fn delete_all_for_account(
    tx: &mut dyn StoreTransaction,
    buffer: &mut MessageBuffer,
    account_id: AccountId,
) -> Result<usize, WorkflowError> {
    let compartments = tx.compartments_by_account(account_id).await?;
    for compartment in &compartments {
        delete_loaded(tx, buffer, compartment).await?;
    }
    Ok(compartments.len())
}

/// Creates one compartment per class-line and announces the inventory.
pub async fn create_inventory(
    tx: &mut dyn StoreTransaction,
    buffer: &mut MessageBuffer,
    account_id: AccountId,
    capacity: u32,
) -> Result<Vec<Compartment>, WorkflowError> {
    let mut compartments = Vec::with_capacity(CompartmentType::ALL.len());
    for compartment_type in CompartmentType::ALL {
        compartments.push(create(tx, buffer, account_id, compartment_type, capacity).await?);
    }
    buffer.put(
        Topic::CashInventoryStatus,
        account_id,
        &CashInventoryStatusEvent::Created { account_id },
    )?;
    Ok(compartments)
}

pub async fn delete_inventory(
    tx: &mut dyn StoreTransaction,
    buffer: &mut MessageBuffer,
    account_id: AccountId,
) -> Result<usize, WorkflowError> {
    let deleted = delete_all_for_account(tx, buffer, account_id).await?;
    buffer.put(
        Topic::CashInventoryStatus,
        account_id,
        &CashInventoryStatusEvent::Deleted { account_id },
    )?;
    Ok(deleted)
}

async fn delete_loaded(
    tx: &mut dyn StoreTransaction,
    buffer: &mut MessageBuffer,
    compartment: &Compartment,
) -> Result<(), WorkflowError> {
    tx.delete_assets_by_compartment(compartment.id).await?;
    tx.delete_compartment(compartment.id).await?;
    buffer.put(
        Topic::CashCompartmentStatus,
        compartment.account_id,
        &CashCompartmentStatusEvent::Deleted {
            account_id: compartment.account_id,
            compartment_id: compartment.id,
            compartment_type: compartment.compartment_type,
        },
    )?;
    Ok(())
}

async fn decorate(tx: &mut dyn StoreTransaction, compartment: Compartment) -> CompartmentView {
    let assets = match asset_store::list_by_compartment(tx, compartment.id).await {
        Ok(assets) => Decoration::Resolved(assets),
        Err(err) => {
            warn!(
                "unable to load assets of compartment {}: {}",
                compartment.id, err
            );
            Decoration::Unavailable(err.to_string())
        }
    };
    CompartmentView {
        compartment,
        assets,
    }
}
