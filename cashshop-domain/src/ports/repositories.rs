use async_trait::async_trait;

use crate::entities::{Asset, Compartment, Item, NewItem, Wallet};
use crate::value_objects::{AccountId, AssetId, CashId, CompartmentId, CompartmentType, ItemId};

/// Entry point to the transactional store.
#[async_trait]
pub trait Store: Send + Sync {
    async fn begin(&self) -> anyhow::Result<Box<dyn StoreTransaction>>;
}

/// One unit of work. Nothing is visible to other transactions until
/// `commit`; dropping the transaction rolls every staged change back.
#[async_trait]
pub trait StoreTransaction: Send {
    async fn wallet_by_account(&mut self, account_id: AccountId) -> anyhow::Result<Option<Wallet>>;
    async fn insert_wallet(&mut self, wallet: &Wallet) -> anyhow::Result<()>;
    /// Returns false when no wallet exists for the account.
    async fn update_wallet(&mut self, wallet: &Wallet) -> anyhow::Result<bool>;
    async fn delete_wallet(&mut self, account_id: AccountId) -> anyhow::Result<bool>;

    async fn item_by_id(&mut self, item_id: ItemId) -> anyhow::Result<Option<Item>>;
    async fn cash_id_exists(&mut self, cash_id: CashId) -> anyhow::Result<bool>;
    async fn insert_item(&mut self, item: NewItem) -> anyhow::Result<Item>;

    async fn compartment_by_id(
        &mut self,
        compartment_id: CompartmentId,
    ) -> anyhow::Result<Option<Compartment>>;
    async fn compartment_by_account_and_type(
        &mut self,
        account_id: AccountId,
        compartment_type: CompartmentType,
    ) -> anyhow::Result<Option<Compartment>>;
    async fn compartments_by_account(
        &mut self,
        account_id: AccountId,
    ) -> anyhow::Result<Vec<Compartment>>;
    /// Fails when the account already owns a compartment of the same type.
    async fn insert_compartment(&mut self, compartment: &Compartment) -> anyhow::Result<()>;
    async fn update_compartment_capacity(
        &mut self,
        compartment_id: CompartmentId,
        capacity: u32,
    ) -> anyhow::Result<Option<Compartment>>;
    async fn delete_compartment(&mut self, compartment_id: CompartmentId) -> anyhow::Result<bool>;

    async fn asset_by_id(&mut self, asset_id: AssetId) -> anyhow::Result<Option<Asset>>;
    /// An item is placed in at most one compartment at a time.
    async fn asset_by_item(&mut self, item_id: ItemId) -> anyhow::Result<Option<Asset>>;
    async fn assets_by_compartment(
        &mut self,
        compartment_id: CompartmentId,
    ) -> anyhow::Result<Vec<Asset>>;
    async fn insert_asset(&mut self, asset: &Asset) -> anyhow::Result<()>;
    async fn delete_asset(&mut self, asset_id: AssetId) -> anyhow::Result<bool>;
    async fn delete_assets_by_item(&mut self, item_id: ItemId) -> anyhow::Result<u64>;
    async fn delete_assets_by_compartment(
        &mut self,
        compartment_id: CompartmentId,
    ) -> anyhow::Result<u64>;

    /// Records the key; false when it was already recorded.
    async fn claim_idempotency_key(&mut self, key: &str) -> anyhow::Result<bool>;

    async fn commit(self: Box<Self>) -> anyhow::Result<()>;
}
