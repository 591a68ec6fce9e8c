// Wire messages exchanged with the transport
//
// Every payload is a JSON object with a SCREAMING_SNAKE_CASE `type` tag and a
// camelCase `body`, keyed by the character or account it concerns.

pub mod account;
pub mod cash_shop;
pub mod character_compartment;
pub mod compartment;
pub mod envelope;
pub mod inventory;
pub mod item;
pub mod wallet;

pub use account::*;
pub use cash_shop::*;
pub use character_compartment::*;
pub use compartment::*;
pub use envelope::*;
pub use inventory::*;
pub use item::*;
pub use wallet::*;
