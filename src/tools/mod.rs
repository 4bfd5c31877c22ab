//! Tools module
//!
//! MCP tool implementations for the calculator and profile store.

pub mod calculator;
pub mod profile;
pub mod status;
