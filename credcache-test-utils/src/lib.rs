//! Test utilities shared across the credcache workspace
//!
//! This crate provides common testing infrastructure including:
//! - An isolated home/config/data layout for child processes ([`HomeEnvTestGuard`])
//! - A throwaway credential store directory ([`StoreTestGuard`])
//!
//! The clippy dead_code lint is disabled for this crate because test utilities
//! may not be used by all tests, and the compiler cannot detect usage across
//! crate boundaries in development dependencies.

#![allow(dead_code)]

pub mod home;
pub mod store;

// Re-export commonly used items
pub use home::HomeEnvTestGuard;
pub use store::StoreTestGuard;
