//! Nutricalc Library
//!
//! Calorie and macronutrient estimation, with an MCP server front end and a
//! local profile store for the last saved targets.

pub mod build_info;
pub mod config;
pub mod db;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod tools;
