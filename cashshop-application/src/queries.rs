// Read-only views over the store

pub mod asset_queries;
pub mod compartment_queries;
pub mod item_queries;
pub mod wallet_queries;
