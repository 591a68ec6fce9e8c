// Domain value objects
pub mod compartment_type;
pub mod currency;
pub mod error_code;
pub mod identifiers;
pub mod inventory_type;

pub use compartment_type::*;
pub use currency::*;
pub use error_code::*;
pub use identifiers::*;
pub use inventory_type::*;
