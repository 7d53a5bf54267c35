//! Command implementations for the wirestack CLI

pub mod hello;
pub mod seed;
pub mod serve;

// Re-export dispatcher functions for flat access from main.rs
pub use hello::run_hello;
pub use seed::run_seed;
pub use serve::run_serve;
