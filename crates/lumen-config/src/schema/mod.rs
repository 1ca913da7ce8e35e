//! Configuration schema types.
//!
//! Each section lives in its own submodule and is re-exported here.

mod camera;
mod renderer;
mod system;

pub use camera::*;
pub use renderer::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LumenConfig {
    pub renderer: RendererConfig,
    pub camera: CameraConfig,
    pub logging: LoggingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let config: LumenConfig = toml::from_str("").unwrap();
        assert_eq!(config.renderer.max_shapes_per_batch, 4000);
        assert_eq!(config.renderer.max_lines_per_batch, 2000);
        assert_eq!(config.renderer.max_texture_slots, 16);
        assert_eq!(config.renderer.texture_array_uniform, "u_Textures");
        assert_eq!(config.renderer.virtual_width, 1280);
        assert_eq!(config.renderer.virtual_height, 720);
        assert_eq!(config.renderer.clear_color, "#000000");
        assert_eq!(config.camera.half_size, 8.0);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config: LumenConfig = toml::from_str(
            r#"
[renderer]
max_texture_slots = 8
"#,
        )
        .unwrap();
        assert_eq!(config.renderer.max_texture_slots, 8);
        assert_eq!(config.renderer.max_shapes_per_batch, 4000);
    }

    #[test]
    fn log_level_is_lowercase_in_toml() {
        let config: LumenConfig = toml::from_str("[logging]\nlevel = \"debug\"\n").unwrap();
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert!(toml::from_str::<LumenConfig>("[logging]\nlevel = \"DEBUG\"\n").is_err());
    }

    #[test]
    fn log_level_as_directive() {
        assert_eq!(LogLevel::Trace.as_str(), "trace");
        assert_eq!(LogLevel::Warn.as_str(), "warn");
        assert_eq!(LogLevel::Error.to_string(), "error");
    }
}
