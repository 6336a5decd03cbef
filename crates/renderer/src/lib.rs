//! Frame orchestration for the progressive path tracer.
//!
//! This crate decides, frame by frame, what to render and when to throw
//! away accumulated samples:
//! - Accumulation state machine and sample budget
//! - Scene selection and GPU-state rebuild ordering
//! - Timed benchmark mode
//! - Input routing to the camera controller
//!
//! GPU work is delegated to a [`RenderPipeline`] implementation.

pub mod accumulation;
pub mod benchmark;
pub mod frame_driver;
pub mod pipeline;
pub mod scene_selector;
pub mod settings;
pub mod ubo;

pub use accumulation::{
    AccumulationCounters, Accumulator, PendingInvalidation, ResetReason, reset_reason,
};
pub use benchmark::{
    BENCHMARK_PERIOD, BenchmarkController, BenchmarkFrame, BenchmarkPhase, BenchmarkState,
    BenchmarkStep,
};
pub use frame_driver::{CAMERA_SPEED, FrameDriver};
pub use pipeline::{DeviceIdle, FrameTarget, Overlay, RenderPath, RenderPipeline, Statistics};
pub use scene_selector::{SceneSelector, SceneSlot};
pub use settings::RenderSettings;
pub use ubo::UniformBufferObject;
