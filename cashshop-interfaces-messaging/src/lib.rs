// Cash Shop Messaging Interface
//
// Decodes inbound topic messages and hands them to the application layer.

pub mod consumer;
pub mod error;
pub mod handlers;

pub use consumer::*;
pub use error::*;
pub use handlers::*;
