//! Relay configuration loader.
//!
//! Reads `config.toml` from the data directory (`~/.courier/` in production)
//! and deserializes it into [`RelayConfig`]. Falls back to defaults when the
//! file is missing or malformed, then applies environment overrides.

use std::path::{Path, PathBuf};

use courier_types::config::RelayConfig;

/// Resolve the data directory.
///
/// `COURIER_DATA_DIR` wins when set, otherwise `~/.courier`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("COURIER_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".courier")
}

/// Database URL for the store under `data_dir`.
pub fn database_url(data_dir: &Path) -> String {
    format!("sqlite://{}/courier.db?mode=rwc", data_dir.display())
}

/// Load relay configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`RelayConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - `COURIER_SYSTEM_INSTRUCTION` and `COURIER_CONTEXT` override the file in
///   either case.
pub async fn load_relay_config(data_dir: &Path) -> RelayConfig {
    let config_path = data_dir.join("config.toml");

    let mut config = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => match toml::from_str::<RelayConfig>(&content) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(
                    "Failed to parse {}: {err}, using defaults",
                    config_path.display()
                );
                RelayConfig::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(
                "No config.toml found at {}, using defaults",
                config_path.display()
            );
            RelayConfig::default()
        }
        Err(err) => {
            tracing::warn!(
                "Failed to read {}: {err}, using defaults",
                config_path.display()
            );
            RelayConfig::default()
        }
    };

    if let Ok(instruction) = std::env::var("COURIER_SYSTEM_INSTRUCTION") {
        config.system_instruction = Some(instruction);
    }
    if let Ok(context) = std::env::var("COURIER_CONTEXT") {
        config.context = Some(context);
    }
    config
}
