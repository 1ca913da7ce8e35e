//! Shared range-validation helpers used by all section validators.

/// Push an error if `value` is outside `[min, max]` (integer).
pub(crate) fn validate_range(errors: &mut Vec<String>, name: &str, value: u32, min: u32, max: u32) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

/// Push an error if `value` is not in `(min, max]` (float). NaN is rejected.
pub(crate) fn validate_positive_f32(errors: &mut Vec<String>, name: &str, value: f32, max: f32) {
    if !(value > 0.0 && value <= max) {
        errors.push(format!("{name} = {value} is out of range (0, {max}]"));
    }
}
