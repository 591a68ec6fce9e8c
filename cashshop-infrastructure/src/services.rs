pub mod catalog_client;
pub mod character_client;
pub mod message_bus;

mod json_api;

pub use catalog_client::*;
pub use character_client::*;
pub use message_bus::*;
