pub mod core;
pub mod error;
pub mod fixed;
pub mod opts;
