//! SPREADWATCH — Cross-venue spread scanner with live opportunity streaming.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod api;
pub mod config;
pub mod distributor;
pub mod engine;
pub mod errors;
pub mod providers;
pub mod types;
