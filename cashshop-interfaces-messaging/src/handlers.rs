pub mod account_handlers;
pub mod cash_shop_handlers;
pub mod character_compartment_handlers;
pub mod compartment_handlers;
pub mod item_handlers;

pub use account_handlers::*;
pub use cash_shop_handlers::*;
pub use character_compartment_handlers::*;
pub use compartment_handlers::*;
pub use item_handlers::*;

use serde::de::DeserializeOwned;

use cashshop_application::AppError;
use cashshop_domain::messages::{Message, Topic};

/// What a handler did with a message it understood.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    Applied,
    Ignored,
}

pub(crate) fn decode<T: DeserializeOwned>(topic: Topic, message: &Message) -> Result<T, AppError> {
    message
        .decode()
        .map_err(|err| AppError::BadRequest(format!("{} key {}: {}", topic, message.key, err)))
}
