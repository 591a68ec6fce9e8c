// Domain entities
pub mod asset;
pub mod character;
pub mod commodity;
pub mod compartment;
pub mod config;
pub mod decoration;
pub mod item;
pub mod wallet;

pub use asset::*;
pub use character::*;
pub use commodity::*;
pub use compartment::*;
pub use config::*;
pub use decoration::*;
pub use item::*;
pub use wallet::*;
