//! Lumen configuration system.
//!
//! TOML-based configuration for the batching renderer, the world camera
//! and logging. Every section has defaults so partial configs work out
//! of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use lumen_config::{config_to_json, load_config};
//!
//! let config = load_config(None).expect("failed to load config");
//! println!("{}", config_to_json(&config));
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{CameraConfig, LogLevel, LoggingConfig, LumenConfig, RendererConfig};

use lumen_common::ConfigError;
use std::path::Path;

/// Load config from `path`, or from the platform default location when `None`.
///
/// The default location gets a commented template written on first run.
/// Unlike [`toml_loader::load_from_path`], validation failures are returned
/// as errors here.
pub fn load_config(path: Option<&Path>) -> Result<LumenConfig, ConfigError> {
    let config = match path {
        Some(path) => {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.to_path_buf()));
            }
            toml_loader::load_from_path(path)?
        }
        None => toml_loader::load_default()?,
    };

    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &LumenConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_to_json_contains_all_sections() {
        let json = config_to_json(&LumenConfig::default());
        assert!(json.contains("\"renderer\""));
        assert!(json.contains("\"camera\""));
        assert!(json.contains("\"logging\""));
        assert!(json.contains("\"u_Textures\""));
    }

    #[test]
    fn load_config_missing_explicit_path_is_file_not_found() {
        let err = load_config(Some(Path::new("/tmp/lumen_missing_config.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn load_config_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[renderer]\nmax_texture_slots = 1\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn default_config_round_trips_through_json() {
        let json = config_to_json(&LumenConfig::default());
        let parsed: LumenConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.renderer.max_shapes_per_batch, 4000);
        assert_eq!(parsed.camera.half_size, 8.0);
        assert_eq!(parsed.logging.level, LogLevel::Info);
    }
}
