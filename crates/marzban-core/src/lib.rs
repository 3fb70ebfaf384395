//! Core constants shared across marzban gateway crates.
//!
//! This crate provides:
//! - Default configuration and normalization values
//! - Error kind labels for logging
//! - Common project metadata

pub mod defaults;
pub mod errors;

// Re-export commonly used items at crate root
pub use defaults::*;
pub use errors::*;

/// Project name.
pub const PROJECT_NAME: &str = "marzban-gateway";
/// Project version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
