use super::helpers::validate_range;
use crate::schema::LumenConfig;
use lumen_common::Color;

/// Validate renderer constraints.
pub(crate) fn validate_renderer(errors: &mut Vec<String>, config: &LumenConfig) {
    let r = &config.renderer;

    validate_range(
        errors,
        "renderer.max_shapes_per_batch",
        r.max_shapes_per_batch,
        1,
        100_000,
    );
    validate_range(
        errors,
        "renderer.max_lines_per_batch",
        r.max_lines_per_batch,
        1,
        100_000,
    );
    // Slot 0 is reserved for the default texture, so one slot leaves no room.
    validate_range(
        errors,
        "renderer.max_texture_slots",
        r.max_texture_slots,
        2,
        32,
    );
    validate_range(errors, "renderer.virtual_width", r.virtual_width, 1, 16384);
    validate_range(errors, "renderer.virtual_height", r.virtual_height, 1, 16384);

    if r.texture_array_uniform.trim().is_empty() {
        errors.push("renderer.texture_array_uniform must not be empty".into());
    }

    if Color::parse(&r.clear_color).is_none() {
        errors.push(format!(
            "renderer.clear_color = {:?} is not a valid colour",
            r.clear_color
        ));
    }
}
