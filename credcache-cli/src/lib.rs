//! # credcache CLI Library
//!
//! Command definitions and handlers behind the `credcache` binary.

pub mod cli;
pub mod completion;
