use std::sync::Arc;

use cashshop_domain::ports::{CharacterDirectory, CommodityCatalog, MessageProducer, Store};
use cashshop_domain::{ReservationCache, RuntimeConfig};

use crate::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub store: Arc<dyn Store>,
    pub catalog: Arc<dyn CommodityCatalog>,
    pub characters: Arc<dyn CharacterDirectory>,
    pub producer: Arc<dyn MessageProducer>,
    pub reservations: Arc<ReservationCache>,
    pub metrics: Arc<Metrics>,
}
