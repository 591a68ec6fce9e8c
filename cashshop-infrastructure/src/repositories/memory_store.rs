use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use cashshop_domain::ports::{Store, StoreTransaction};
use cashshop_domain::{
    AccountId, Asset, AssetId, CashId, Compartment, CompartmentId, CompartmentType, Item, ItemId,
    NewItem, Wallet,
};

/// Operations that can be told to fail, for exercising rollback paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultPoint {
    ReadItem,
    ListAssets,
    InsertItem,
    InsertAsset,
    UpdateWallet,
    Commit,
}

#[derive(Debug, Clone, Default)]
struct Tables {
    wallets: HashMap<AccountId, Wallet>,
    items: BTreeMap<ItemId, Item>,
    last_item_id: u32,
    compartments: BTreeMap<CompartmentId, Compartment>,
    assets: Vec<Asset>,
}

/// How many purchase idempotency keys are remembered by default.
pub const DEFAULT_IDEMPOTENCY_KEY_CAPACITY: usize = 100_000;

/// Claimed idempotency keys. Once `capacity` keys are held the oldest claim
/// is forgotten first, so a redelivery older than that is applied again.
#[derive(Debug)]
struct IdempotencyKeys {
    capacity: usize,
    keys: HashSet<String>,
    order: VecDeque<String>,
}

impl IdempotencyKeys {
    fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            keys: HashSet::new(),
            order: VecDeque::new(),
        }
    }

    fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    fn record(&mut self, key: String) {
        if !self.keys.insert(key.clone()) {
            return;
        }
        self.order.push_back(key);
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.keys.remove(&oldest);
            }
        }
    }
}

#[derive(Debug)]
struct Shared {
    tables: Tables,
    idempotency: IdempotencyKeys,
}

/// Serializable in-process store. A transaction owns the table lock from
/// `begin` until it commits or is dropped, and works on a private copy that
/// replaces the shared tables only on commit. Idempotency keys are not
/// copied; claims are staged and recorded on commit.
pub struct InMemoryStore {
    shared: Arc<AsyncMutex<Shared>>,
    faults: Arc<Mutex<HashSet<FaultPoint>>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::with_idempotency_capacity(DEFAULT_IDEMPOTENCY_KEY_CAPACITY)
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idempotency_capacity(capacity: usize) -> Self {
        Self {
            shared: Arc::new(AsyncMutex::new(Shared {
                tables: Tables::default(),
                idempotency: IdempotencyKeys::new(capacity),
            })),
            faults: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Makes every later call through `point` fail, including calls from
    /// transactions already open, until `clear_faults`.
    pub fn fail_on(&self, point: FaultPoint) {
        self.faults.lock().insert(point);
    }

    pub fn clear_faults(&self) {
        self.faults.lock().clear();
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>> {
        let guard = self.shared.clone().lock_owned().await;
        let staged = guard.tables.clone();
        Ok(Box::new(MemoryTransaction {
            guard,
            staged,
            claimed: Vec::new(),
            faults: self.faults.clone(),
        }))
    }
}

struct MemoryTransaction {
    guard: OwnedMutexGuard<Shared>,
    staged: Tables,
    claimed: Vec<String>,
    faults: Arc<Mutex<HashSet<FaultPoint>>>,
}

impl MemoryTransaction {
    fn check(&self, point: FaultPoint) -> Result<()> {
        if self.faults.lock().contains(&point) {
            return Err(anyhow!("injected {:?} failure", point));
        }
        Ok(())
    }
}

#[async_trait]
impl StoreTransaction for MemoryTransaction {
    async fn wallet_by_account(&mut self, account_id: AccountId) -> Result<Option<Wallet>> {
        Ok(self.staged.wallets.get(&account_id).copied())
    }

    async fn insert_wallet(&mut self, wallet: &Wallet) -> Result<()> {
        if self.staged.wallets.contains_key(&wallet.account_id) {
            return Err(anyhow!("wallet for account {} already exists", wallet.account_id));
        }
        self.staged.wallets.insert(wallet.account_id, *wallet);
        Ok(())
    }

    async fn update_wallet(&mut self, wallet: &Wallet) -> Result<bool> {
        self.check(FaultPoint::UpdateWallet)?;
        match self.staged.wallets.get_mut(&wallet.account_id) {
            Some(existing) => {
                *existing = *wallet;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_wallet(&mut self, account_id: AccountId) -> Result<bool> {
        Ok(self.staged.wallets.remove(&account_id).is_some())
    }

    async fn item_by_id(&mut self, item_id: ItemId) -> Result<Option<Item>> {
        self.check(FaultPoint::ReadItem)?;
        Ok(self.staged.items.get(&item_id).cloned())
    }

    async fn cash_id_exists(&mut self, cash_id: CashId) -> Result<bool> {
        Ok(self
            .staged
            .items
            .values()
            .any(|item| item.cash_id == cash_id))
    }

    async fn insert_item(&mut self, item: NewItem) -> Result<Item> {
        self.check(FaultPoint::InsertItem)?;
        let id = self
            .staged
            .last_item_id
            .checked_add(1)
            .ok_or_else(|| anyhow!("item id space exhausted"))?;
        self.staged.last_item_id = id;
        let item = item.with_id(ItemId(id));
        self.staged.items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn compartment_by_id(&mut self, compartment_id: CompartmentId) -> Result<Option<Compartment>> {
        Ok(self.staged.compartments.get(&compartment_id).copied())
    }

    async fn compartment_by_account_and_type(
        &mut self,
        account_id: AccountId,
        compartment_type: CompartmentType,
    ) -> Result<Option<Compartment>> {
        Ok(self
            .staged
            .compartments
            .values()
            .find(|c| c.account_id == account_id && c.compartment_type == compartment_type)
            .copied())
    }

    async fn compartments_by_account(&mut self, account_id: AccountId) -> Result<Vec<Compartment>> {
        Ok(self
            .staged
            .compartments
            .values()
            .filter(|c| c.account_id == account_id)
            .copied()
            .collect())
    }

    async fn insert_compartment(&mut self, compartment: &Compartment) -> Result<()> {
        let duplicate = self.staged.compartments.values().any(|c| {
            c.account_id == compartment.account_id
                && c.compartment_type == compartment.compartment_type
        });
        if duplicate {
            return Err(anyhow!(
                "account {} already has a {} compartment",
                compartment.account_id,
                compartment.compartment_type.as_str()
            ));
        }
        self.staged.compartments.insert(compartment.id, *compartment);
        Ok(())
    }

    async fn update_compartment_capacity(
        &mut self,
        compartment_id: CompartmentId,
        capacity: u32,
    ) -> Result<Option<Compartment>> {
        Ok(self
            .staged
            .compartments
            .get_mut(&compartment_id)
            .map(|compartment| {
                compartment.capacity = capacity;
                *compartment
            }))
    }

    async fn delete_compartment(&mut self, compartment_id: CompartmentId) -> Result<bool> {
        Ok(self.staged.compartments.remove(&compartment_id).is_some())
    }

    async fn asset_by_id(&mut self, asset_id: AssetId) -> Result<Option<Asset>> {
        Ok(self
            .staged
            .assets
            .iter()
            .find(|asset| asset.id == asset_id)
            .copied())
    }

    async fn asset_by_item(&mut self, item_id: ItemId) -> Result<Option<Asset>> {
        Ok(self
            .staged
            .assets
            .iter()
            .find(|asset| asset.item_id == item_id)
            .copied())
    }

    async fn assets_by_compartment(&mut self, compartment_id: CompartmentId) -> Result<Vec<Asset>> {
        self.check(FaultPoint::ListAssets)?;
        Ok(self
            .staged
            .assets
            .iter()
            .filter(|asset| asset.compartment_id == compartment_id)
            .copied()
            .collect())
    }

    async fn insert_asset(&mut self, asset: &Asset) -> Result<()> {
        self.check(FaultPoint::InsertAsset)?;
        if !self.staged.compartments.contains_key(&asset.compartment_id) {
            return Err(anyhow!("compartment {} does not exist", asset.compartment_id));
        }
        self.staged.assets.push(*asset);
        Ok(())
    }

    async fn delete_asset(&mut self, asset_id: AssetId) -> Result<bool> {
        let before = self.staged.assets.len();
        self.staged.assets.retain(|asset| asset.id != asset_id);
        Ok(self.staged.assets.len() != before)
    }

    async fn delete_assets_by_item(&mut self, item_id: ItemId) -> Result<u64> {
        let before = self.staged.assets.len();
        self.staged.assets.retain(|asset| asset.item_id != item_id);
        Ok((before - self.staged.assets.len()) as u64)
    }

    async fn delete_assets_by_compartment(&mut self, compartment_id: CompartmentId) -> Result<u64> {
        let before = self.staged.assets.len();
        self.staged
            .assets
            .retain(|asset| asset.compartment_id != compartment_id);
        Ok((before - self.staged.assets.len()) as u64)
    }

    async fn claim_idempotency_key(&mut self, key: &str) -> Result<bool> {
        let already_claimed = self.guard.idempotency.contains(key)
            || self.claimed.iter().any(|claimed| claimed == key);
        if already_claimed {
            return Ok(false);
        }
        self.claimed.push(key.to_string());
        Ok(true)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.check(FaultPoint::Commit)?;
        let MemoryTransaction {
            mut guard,
            staged,
            claimed,
            ..
        } = *self;
        guard.tables = staged;
        for key in claimed {
            guard.idempotency.record(key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use cashshop_domain::{CharacterId, TemplateId};

    fn new_item(cash_id: i64) -> NewItem {
        NewItem {
            cash_id: CashId(cash_id),
            template_id: TemplateId(5_211_048),
            quantity: 1,
            flag: 0,
            purchased_by: CharacterId(1),
            expiration: Utc::now(),
        }
    }

    #[tokio::test]
    async fn committed_changes_are_visible_to_later_transactions() {
        let store = InMemoryStore::new();
        let mut tx = store.begin().await.expect("begin");
        tx.insert_wallet(&Wallet::new(AccountId(1), 10, 0, 0))
            .await
            .expect("insert");
        tx.commit().await.expect("commit");

        let mut tx = store.begin().await.expect("begin");
        assert_eq!(
            tx.wallet_by_account(AccountId(1)).await.expect("read"),
            Some(Wallet::new(AccountId(1), 10, 0, 0))
        );
    }

    #[tokio::test]
    async fn dropped_transaction_rolls_back() {
        let store = InMemoryStore::new();
        {
            let mut tx = store.begin().await.expect("begin");
            tx.insert_item(new_item(42)).await.expect("insert");
            tx.claim_idempotency_key("purchase:1:a").await.expect("claim");
        }
        let mut tx = store.begin().await.expect("begin");
        assert!(!tx.cash_id_exists(CashId(42)).await.expect("exists"));
        assert!(tx.claim_idempotency_key("purchase:1:a").await.expect("claim"));
    }

    #[tokio::test]
    async fn committed_keys_are_claimed_once() {
        let store = InMemoryStore::new();
        let mut tx = store.begin().await.expect("begin");
        assert!(tx.claim_idempotency_key("purchase:1:a").await.expect("claim"));
        assert!(!tx.claim_idempotency_key("purchase:1:a").await.expect("claim"));
        tx.commit().await.expect("commit");

        let mut tx = store.begin().await.expect("begin");
        assert!(!tx.claim_idempotency_key("purchase:1:a").await.expect("claim"));
    }

    #[tokio::test]
    async fn oldest_idempotency_key_is_forgotten_past_capacity() {
        let store = InMemoryStore::with_idempotency_capacity(2);
        for key in ["purchase:1:a", "purchase:1:b", "purchase:1:c"] {
            let mut tx = store.begin().await.expect("begin");
            assert!(tx.claim_idempotency_key(key).await.expect("claim"));
            tx.commit().await.expect("commit");
        }

        let mut tx = store.begin().await.expect("begin");
        assert!(!tx.claim_idempotency_key("purchase:1:b").await.expect("claim"));
        assert!(!tx.claim_idempotency_key("purchase:1:c").await.expect("claim"));
        assert!(tx.claim_idempotency_key("purchase:1:a").await.expect("claim"));
    }

    #[tokio::test]
    async fn failed_commit_keeps_previous_state() {
        let store = InMemoryStore::new();
        store.fail_on(FaultPoint::Commit);
        let mut tx = store.begin().await.expect("begin");
        tx.insert_wallet(&Wallet::empty(AccountId(1)))
            .await
            .expect("insert");
        assert!(tx.commit().await.is_err());

        store.clear_faults();
        let mut tx = store.begin().await.expect("begin");
        assert!(tx.wallet_by_account(AccountId(1)).await.expect("read").is_none());
    }

    #[tokio::test]
    async fn item_ids_are_sequential() {
        let store = InMemoryStore::new();
        let mut tx = store.begin().await.expect("begin");
        let first = tx.insert_item(new_item(1)).await.expect("insert");
        let second = tx.insert_item(new_item(2)).await.expect("insert");
        assert_eq!(first.id, ItemId(1));
        assert_eq!(second.id, ItemId(2));
    }

    #[tokio::test]
    async fn one_compartment_per_account_and_type() {
        let store = InMemoryStore::new();
        let mut tx = store.begin().await.expect("begin");
        tx.insert_compartment(&Compartment::new(AccountId(1), CompartmentType::Cygnus, 55))
            .await
            .expect("first");
        assert!(tx
            .insert_compartment(&Compartment::new(AccountId(1), CompartmentType::Cygnus, 55))
            .await
            .is_err());
        tx.insert_compartment(&Compartment::new(AccountId(2), CompartmentType::Cygnus, 55))
            .await
            .expect("other account");
    }

    #[tokio::test]
    async fn fault_reaches_open_transactions() {
        let store = InMemoryStore::new();
        let mut tx = store.begin().await.expect("begin");
        let compartment = Compartment::new(AccountId(1), CompartmentType::Explorer, 55);
        tx.insert_compartment(&compartment).await.expect("insert");

        store.fail_on(FaultPoint::ListAssets);
        assert!(tx.assets_by_compartment(compartment.id).await.is_err());
        store.clear_faults();
        assert!(tx
            .assets_by_compartment(compartment.id)
            .await
            .expect("list")
            .is_empty());
    }

    #[tokio::test]
    async fn transactions_are_serialized() {
        let store = Arc::new(InMemoryStore::new());
        let mut tx = store.begin().await.expect("begin");
        tx.insert_wallet(&Wallet::new(AccountId(1), 0, 0, 0))
            .await
            .expect("insert");
        tx.commit().await.expect("commit");

        let mut handles = Vec::new();
        for _ in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let mut tx = store.begin().await.expect("begin");
                let wallet = tx
                    .wallet_by_account(AccountId(1))
                    .await
                    .expect("read")
                    .expect("wallet");
                tokio::task::yield_now().await;
                tx.update_wallet(&Wallet::new(AccountId(1), wallet.credit + 1, 0, 0))
                    .await
                    .expect("update");
                tx.commit().await.expect("commit");
            }));
        }
        for handle in handles {
            handle.await.expect("task");
        }

        let mut tx = store.begin().await.expect("begin");
        let wallet = tx
            .wallet_by_account(AccountId(1))
            .await
            .expect("read")
            .expect("wallet");
        assert_eq!(wallet.credit, 20);
    }
}
