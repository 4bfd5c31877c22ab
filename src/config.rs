//! Runtime configuration
//!
//! Everything is read from the environment:
//! - `NUTRICALC_DATABASE_PATH`: profile database file
//! - `RUST_LOG`: log filter, on top of the `nutricalc=info` default

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

/// Environment variable overriding the database location
pub const DATABASE_PATH_ENV: &str = "NUTRICALC_DATABASE_PATH";

/// Get the database path from environment or use default
pub fn database_path() -> PathBuf {
    std::env::var(DATABASE_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_database_path())
}

/// `<project>/data/nutricalc.db`, where the project root is found by walking
/// up from `target/{debug,release}` if the binary lives there
fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(root) = path.parent().and_then(|target| target.parent()) {
            path = root.to_path_buf();
        }
    }

    path.push("data");
    path.push("nutricalc.db");
    path
}

/// Initialize logging to stderr so stdout stays free for MCP traffic
pub fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("nutricalc=info".parse()?))
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_path_ends_with_db_file() {
        let path = default_database_path();
        assert!(path.ends_with("data/nutricalc.db"));
    }
}
