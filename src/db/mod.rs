//! Database module
//!
//! SQLite pool, migrations and the profile store seam.

pub mod connection;
pub mod migrations;

pub use connection::{Database, DbError, DbResult};
