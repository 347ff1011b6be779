use thiserror::Error;

/// Rejected session or camera configuration.
///
/// Configuration is validated once, at construction or on an explicit
/// reconfigure; it is never clamped into a zero-area or degenerate state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("resolution must be non-zero, got {width}x{height}")]
    Resolution {
        width: u32,
        height: u32,
    },

    #[error("horizontal field of view must lie in (0, 180) degrees, got {0}")]
    FieldOfView(f32),

    #[error("{0} must be finite")]
    NonFinite(&'static str),
}

/// Rejected camera input.
///
/// Out-of-range values are clamped silently; only values that cannot be
/// clamped (NaN, infinities) are refused.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CameraError {
    #[error("non-finite delta {value} passed to {op}")]
    NonFinite {
        op: &'static str,
        value: f32,
    },
}
