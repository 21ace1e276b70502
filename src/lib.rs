//! Polymarket prediction-market tools over MCP.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod platforms;
pub mod tools;
pub mod server;
