//! Scene snapshot: a fixed-capacity, ordered list of sphere primitives.
//!
//! Responsibilities:
//! - validate primitive attributes on insertion
//! - track mutation so the accumulated image can be invalidated
//! - pack primitives into the device layout uploaded every frame
//!
//! Index 0 is conventionally the ground, the last index a light. Nothing
//! enforces that ordering.

mod error;
mod primitive;
mod snapshot;

pub use error::SceneError;
pub use primitive::{DevicePrimitive, Primitive};
pub use snapshot::Scene;
