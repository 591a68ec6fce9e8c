pub mod context;
pub mod lifecycle;
pub mod replay;

pub use lifecycle::{run_standalone, serve};
