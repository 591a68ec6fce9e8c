use std::sync::Arc;
use std::time::Duration;

use cashshop_domain::messages::{CashShopStatusEvent, Message, Topic};
use cashshop_domain::ports::Store;
use cashshop_domain::{
    AccountId, Character, CharacterId, Commodity, InventoryCapacities, InventoryType,
    ReservationCache, RuntimeConfig, SerialNumber, TemplateId, Wallet,
};
use cashshop_infrastructure::{
    InMemoryCharacterDirectory, InMemoryCommodityCatalog, InMemoryMessageBus, InMemoryStore,
};

use crate::commands::account_commands;
use crate::{AppState, Metrics};

pub struct Harness {
    pub state: AppState,
    pub store: Arc<InMemoryStore>,
    pub bus: Arc<InMemoryMessageBus>,
    pub catalog: Arc<InMemoryCommodityCatalog>,
    pub characters: Arc<InMemoryCharacterDirectory>,
}

impl Harness {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::default());
        let bus = Arc::new(InMemoryMessageBus::default().with_journal());
        let catalog = Arc::new(InMemoryCommodityCatalog::default());
        let characters = Arc::new(InMemoryCharacterDirectory::default());
        let config = RuntimeConfig::default();
        let state = AppState {
            reservations: Arc::new(ReservationCache::new(Duration::from_secs(
                config.reservation_ttl_seconds,
            ))),
            config,
            store: store.clone(),
            catalog: catalog.clone(),
            characters: characters.clone(),
            producer: bus.clone(),
            metrics: Arc::new(Metrics::default()),
        };
        Self {
            state,
            store,
            bus,
            catalog,
            characters,
        }
    }

    /// Account with a fresh inventory, a funded wallet and one explorer character.
    pub async fn seed_account(&self, account_id: u32, character_id: u32, credit: u32) {
        account_commands::account_created(&self.state, AccountId(account_id))
            .await
            .expect("account created");
        let mut tx = self.store.begin().await.expect("begin");
        tx.update_wallet(&Wallet::new(AccountId(account_id), credit, 0, 0))
            .await
            .expect("fund wallet");
        tx.commit().await.expect("commit");
        self.add_character(character_id, account_id, 100, 24);
        self.bus.clear();
    }

    pub fn add_character(&self, character_id: u32, account_id: u32, job_id: u16, slots: u32) {
        let mut capacities = InventoryCapacities::default();
        for inventory_type in InventoryType::ALL {
            capacities = capacities.with(inventory_type, slots);
        }
        self.characters.insert(Character {
            id: CharacterId(character_id),
            account_id: AccountId(account_id),
            name: format!("character{}", character_id),
            job_id,
            inventory: Some(capacities),
        });
    }

    pub fn add_commodity(&self, serial_number: u32, template_id: u32, price: u32) {
        self.catalog.insert(Commodity {
            serial_number: SerialNumber(serial_number),
            template_id: TemplateId(template_id),
            count: 1,
            price,
            period: 90,
            priority: 0,
            gender: 2,
            on_sale: true,
        });
    }

    pub async fn wallet(&self, account_id: u32) -> Wallet {
        let mut tx = self.store.begin().await.expect("begin");
        tx.wallet_by_account(AccountId(account_id))
            .await
            .expect("read")
            .expect("wallet")
    }

    pub fn published(&self, topic: Topic) -> Vec<Message> {
        self.bus.published(topic)
    }

    pub fn cash_shop_events(&self) -> Vec<CashShopStatusEvent> {
        self.published(Topic::CashShopStatus)
            .iter()
            .map(|message| message.decode().expect("cash shop event"))
            .collect()
    }
}
