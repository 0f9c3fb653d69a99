//! Tessera Core - Shared foundation types for the tessera storage engine
//!
//! This crate provides the pieces every other tessera crate builds on:
//! - Monotonic component identities that are never recycled
//! - World configuration loaded from TOML
//! - Configuration error types

pub mod config;
pub mod error;
pub mod id;

pub use config::{DuplicatePolicy, WorldConfig};
pub use error::ConfigError;
pub use id::{ComponentId, IdAllocator};
