//! Providers Module - External Data Sources
//!
//! The marketplace REST + RPC-style API and off-chain metadata hosts.

pub mod magiceden;

pub use magiceden::*;
