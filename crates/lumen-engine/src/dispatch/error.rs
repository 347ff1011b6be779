use thiserror::Error;

use super::DeviceBuffer;

/// Failure reported by a compute backend.
///
/// Device errors are not retried: the session treats them as fatal and the
/// caller must rebuild the device context.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeviceError {
    #[error("device buffers are not allocated")]
    NotConfigured,

    #[error("kernel build failed: {0}")]
    Kernel(String),

    #[error("buffer allocation failed: {0}")]
    Allocation(String),

    #[error("upload of {len} bytes exceeds {buffer:?} capacity of {capacity} bytes")]
    Overflow {
        buffer: DeviceBuffer,
        len: u64,
        capacity: u64,
    },

    #[error("upload to {buffer:?} failed: {reason}")]
    Upload {
        buffer: DeviceBuffer,
        reason: String,
    },

    #[error("clearing {buffer:?} failed: {reason}")]
    Clear {
        buffer: DeviceBuffer,
        reason: String,
    },

    #[error("updating frame scalars failed: {0}")]
    Scalars(String),

    #[error("acquiring the presentation buffer failed: {0}")]
    Acquire(String),

    #[error("kernel dispatch failed: {0}")]
    Dispatch(String),

    #[error("releasing the presentation buffer failed: {0}")]
    Release(String),

    #[error("presentation buffer ownership violated: {0}")]
    Ownership(&'static str),
}
