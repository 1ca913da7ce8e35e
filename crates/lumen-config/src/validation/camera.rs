use super::helpers::validate_positive_f32;
use crate::schema::LumenConfig;

/// Validate camera constraints.
pub(crate) fn validate_camera(errors: &mut Vec<String>, config: &LumenConfig) {
    validate_positive_f32(errors, "camera.half_size", config.camera.half_size, 10_000.0);
}
