// ---------------------------------------------------------------------------
// RendererError
// ---------------------------------------------------------------------------

/// Errors raised while creating render objects.
///
/// Only construction is fallible. Once a batch or draw state exists its
/// per-shape operations cannot fail.
#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    #[error("no suitable GPU adapter found")]
    AdapterNotFound,

    #[error("device error: {0}")]
    DeviceError(String),

    #[error("failed to create {0}")]
    ResourceCreation(String),

    #[error("invalid create info: {0}")]
    InvalidCreateInfo(String),

    #[error("invalid resource: {0}")]
    InvalidResource(String),
}

impl From<wgpu::RequestDeviceError> for RendererError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        RendererError::DeviceError(e.to_string())
    }
}

impl From<RendererError> for lumen_common::LumenError {
    fn from(e: RendererError) -> Self {
        lumen_common::LumenError::Renderer(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RendererError>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renderer_error_adapter_not_found_display() {
        let err = RendererError::AdapterNotFound;
        assert_eq!(err.to_string(), "no suitable GPU adapter found");
    }

    #[test]
    fn renderer_error_device_display() {
        let err = RendererError::DeviceError("out of memory".to_string());
        assert_eq!(err.to_string(), "device error: out of memory");
    }

    #[test]
    fn renderer_error_create_info_display() {
        let err = RendererError::InvalidCreateInfo("max_shapes_per_batch is 0".into());
        assert_eq!(
            err.to_string(),
            "invalid create info: max_shapes_per_batch is 0"
        );
    }

    #[test]
    fn renderer_error_converts_to_lumen_error() {
        let err: lumen_common::LumenError =
            RendererError::ResourceCreation("vertex buffer".into()).into();
        assert_eq!(
            err.to_string(),
            "renderer error: failed to create vertex buffer"
        );
    }
}
