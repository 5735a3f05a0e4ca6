mod config;
pub mod database;
pub mod migrations;

pub use config::{Config, DriverConfig, DurationsConfig, GoalsConfig, RotationConfig};
pub use database::{Database, DaySummary, SessionRecord};

use std::path::PathBuf;

/// Returns the directory holding `config.toml` and `focusclock.db`.
///
/// `FOCUSCLOCK_DATA_DIR` wins when set. Otherwise `~/.config/focusclock`,
/// or `~/.config/focusclock-dev` when `FOCUSCLOCK_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("FOCUSCLOCK_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("FOCUSCLOCK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("focusclock-dev")
            } else {
                base_dir.join("focusclock")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
