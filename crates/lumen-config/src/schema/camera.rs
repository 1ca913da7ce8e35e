use serde::{Deserialize, Serialize};

/// World camera configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Half the visible world width in world units (valid range: (0, 10000]).
    pub half_size: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self { half_size: 8.0 }
    }
}
