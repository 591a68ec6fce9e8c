use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};

use cashshop_application::{AppState, Metrics};
use cashshop_domain::ports::{CharacterDirectory, CommodityCatalog};
use cashshop_domain::ReservationCache;
use cashshop_infrastructure::{
    AppConfig, InMemoryCharacterDirectory, InMemoryCommodityCatalog, InMemoryMessageBus,
    InMemoryStore, RestCharacterDirectory, RestCommodityCatalog,
};

pub struct AppContext {
    pub state: AppState,
    pub bus: Arc<InMemoryMessageBus>,
}

impl AppContext {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let bus = Arc::new(InMemoryMessageBus::new(config.consumer_buffer));
        Self::with_bus(config, bus)
    }

    /// Builds the context around an existing bus, e.g. one with a journal.
    pub fn with_bus(config: &AppConfig, bus: Arc<InMemoryMessageBus>) -> Result<Self> {
        let runtime_config = config.to_runtime_config();
        let timeout = Duration::from_secs(runtime_config.request_timeout_seconds.max(1));

        let catalog: Arc<dyn CommodityCatalog> = match &config.catalog_base_url {
            Some(url) => {
                info!("commodity catalog at {}", url);
                Arc::new(RestCommodityCatalog::new(url.clone(), timeout)?)
            }
            None => {
                warn!("catalog_base_url not set, using an empty in-memory catalog");
                Arc::new(InMemoryCommodityCatalog::default())
            }
        };
        let characters: Arc<dyn CharacterDirectory> = match &config.character_base_url {
            Some(url) => {
                info!("character service at {}", url);
                Arc::new(RestCharacterDirectory::new(url.clone(), timeout)?)
            }
            None => {
                warn!("character_base_url not set, using an empty in-memory directory");
                Arc::new(InMemoryCharacterDirectory::default())
            }
        };

        let reservations = Arc::new(ReservationCache::new(Duration::from_secs(
            runtime_config.reservation_ttl_seconds,
        )));

        let state = AppState {
            config: runtime_config,
            store: Arc::new(InMemoryStore::with_idempotency_capacity(
                config.idempotency_key_capacity,
            )),
            catalog,
            characters,
            producer: bus.clone(),
            reservations,
            metrics: Arc::new(Metrics::default()),
        };

        Ok(Self { state, bus })
    }
}
