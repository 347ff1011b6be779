use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error("scene is full ({capacity} primitives)")]
    Full { capacity: usize },

    #[error("primitive index {index} out of range (len {len})")]
    OutOfRange {
        index: usize,
        len: usize,
    },

    #[error("invalid primitive: {0}")]
    Invalid(&'static str),
}
