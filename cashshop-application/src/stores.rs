// Store helpers that run inside a caller-owned transaction and buffer the
// status events of every mutation they make.

pub mod asset_store;
pub mod compartment_store;
pub mod item_store;
pub mod wallet_ledger;
