// Cash Shop Application Layer

pub mod buffer;
pub mod commands;
pub mod error;
pub mod metrics;
pub mod ops;
pub mod queries;
pub mod state;
pub mod stores;

#[cfg(test)]
pub(crate) mod test_support;

pub use buffer::MessageBuffer;
pub use error::{AppError, WorkflowError};
pub use metrics::Metrics;
pub use state::AppState;
