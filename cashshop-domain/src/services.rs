// Domain services
pub mod reservation_cache;

pub use reservation_cache::*;
