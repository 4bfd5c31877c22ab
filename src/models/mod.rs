//! Data models
//!
//! Rust structs representing database entities.

mod profile;

pub use profile::{ProfileStore, ProfileTargets, ProfileTargetsUpdate};
