use cashshop_domain::ports::StoreTransaction;
use cashshop_domain::{Asset, AssetId, AssetView, CompartmentId, Decoration, ItemId};

use crate::WorkflowError;

/// Places an item into a compartment after checking there is room for it.
pub async fn create(
    tx: &mut dyn StoreTransaction,
    compartment_id: CompartmentId,
    item_id: ItemId,
) -> Result<Asset, WorkflowError> {
    let compartment = tx
        .compartment_by_id(compartment_id)
        .await?
        .ok_or_else(|| WorkflowError::CompartmentNotFound(compartment_id.to_string()))?;
    let occupied = tx.assets_by_compartment(compartment_id).await?.len();
    if occupied as u64 >= u64::from(compartment.capacity) {
        return Err(WorkflowError::InventoryFull(compartment_id));
    }

    let asset = Asset {
        id: AssetId::generate(),
        compartment_id,
        item_id,
    };
    tx.insert_asset(&asset).await?;
    Ok(asset)
}

pub async fn get_by_id(
    tx: &mut dyn StoreTransaction,
    asset_id: AssetId,
) -> Result<Option<AssetView>, WorkflowError> {
    match tx.asset_by_id(asset_id).await? {
        Some(asset) => Ok(Some(decorate(tx, asset).await)),
        None => Ok(None),
    }
}

/// The single placement of `item_id`, if it is placed anywhere.
pub async fn get_by_item(
    tx: &mut dyn StoreTransaction,
    item_id: ItemId,
) -> Result<Option<Asset>, WorkflowError> {
    Ok(tx.asset_by_item(item_id).await?)
}

pub async fn list_by_compartment(
    tx: &mut dyn StoreTransaction,
    compartment_id: CompartmentId,
) -> Result<Vec<AssetView>, WorkflowError> {
    let assets = tx.assets_by_compartment(compartment_id).await?;
    let mut views = Vec::with_capacity(assets.len());
    for asset in assets {
        views.push(decorate(tx, asset).await);
    }
    Ok(views)
}

pub async fn delete(tx: &mut dyn StoreTransaction, asset_id: AssetId) -> Result<bool, WorkflowError> {
    Ok(tx.delete_asset(asset_id).await?)
}

pub async fn delete_by_item(
    tx: &mut dyn StoreTransaction,
    item_id: ItemId,
) -> Result<u64, WorkflowError> {
    Ok(tx.delete_assets_by_item(item_id).await?)
}

async fn decorate(tx: &mut dyn StoreTransaction, asset: Asset) -> AssetView {
    let item = Decoration::from_lookup(tx.item_by_id(asset.item_id).await);
    AssetView { asset, item }
}
