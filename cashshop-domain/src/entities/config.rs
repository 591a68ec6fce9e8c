// Runtime configuration shared with the application layer

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub reservation_ttl_seconds: u64,
    pub reservation_sweep_seconds: u64,
    pub item_expiration_days: i64,
    pub default_compartment_capacity: u32,
    pub request_timeout_seconds: u64,
    pub consumer_buffer: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            reservation_ttl_seconds: 300,
            reservation_sweep_seconds: 60,
            item_expiration_days: 30,
            default_compartment_capacity: crate::DEFAULT_COMPARTMENT_CAPACITY,
            request_timeout_seconds: 15,
            consumer_buffer: 256,
        }
    }
}
