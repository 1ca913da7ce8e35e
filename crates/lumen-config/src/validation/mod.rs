//! Full configuration validation.
//!
//! Each section has its own validator; this orchestrator calls them all
//! and collects errors into a single `ConfigError`.

mod camera;
mod helpers;
mod renderer;


use crate::schema::LumenConfig;
use lumen_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &LumenConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    renderer::validate_renderer(&mut errors, config);
    camera::validate_camera(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
