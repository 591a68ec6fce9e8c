// Background maintenance tasks

pub mod reservation_sweeper;

pub use reservation_sweeper::*;
