//! Camera control for the ray tracer.
//!
//! This crate turns discrete input events and per-frame time deltas into a
//! camera pose, reporting whether the pose changed so accumulated samples
//! can be invalidated.

pub mod camera;

pub use camera::ModelViewController;
