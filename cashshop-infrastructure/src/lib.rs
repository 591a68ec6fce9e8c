// Cash Shop Infrastructure Layer

pub mod config;
pub mod repositories;
pub mod services;

pub use config::*;
pub use repositories::*;
pub use services::*;
