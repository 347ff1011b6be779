//! Session context: the explicit owner of all per-run renderer state.
//!
//! A [`Session`] is created once from a [`SessionConfig`] and a scene, driven
//! one frame at a time through [`Session::render_frame`], and closed with
//! [`Session::finish`]. There is no ambient global state.

mod config;
mod context;

pub use config::SessionConfig;
pub use context::{Session, SessionSummary};
