//! Contracts of the GPU pipeline and UI overlay collaborators.
//!
//! The frame driver never touches Vulkan objects directly. It sequences
//! these calls and hands the loaded scene to the pipeline by reference.

use ash::vk;
use tracer_core::Result;
use tracer_resources::Scene;

use crate::settings::RenderSettings;
use crate::ubo::UniformBufferObject;

/// Proof that the device has finished all submitted work.
///
/// Only [`RenderPipeline::wait_idle`] callers inside this crate can mint
/// one, so every teardown that takes `&DeviceIdle` is statically ordered
/// after an idle wait.
#[derive(Debug)]
pub struct DeviceIdle {
    _private: (),
}

impl DeviceIdle {
    pub(crate) fn new() -> Self {
        Self { _private: () }
    }
}

/// A swapchain image acquired for the current frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameTarget {
    pub command_buffer: vk::CommandBuffer,
    pub image_index: u32,
}

/// Which shading path draws the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderPath {
    RayTraced,
    Rasterized { wireframe: bool },
}

/// Per-frame numbers shown by the overlay.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Statistics {
    pub framebuffer_size: vk::Extent2D,
    pub frame_rate: f32,
    /// Giga-rays per second; zero on the raster path
    pub ray_rate: f32,
    pub total_samples: u32,
}

/// The low-level graphics layer.
pub trait RenderPipeline {
    type Overlay: Overlay;

    /// Block until the device has no work in flight.
    fn wait_idle(&mut self) -> Result<()>;

    /// Build the swapchain and every object that depends on it.
    ///
    /// Acceleration structures for the current scene exist by the time this
    /// is called.
    fn create_swapchain(&mut self, extent: vk::Extent2D) -> Result<()>;

    fn delete_swapchain(&mut self, idle: &DeviceIdle);

    fn swapchain_extent(&self) -> vk::Extent2D;

    /// Build the overlay for the current swapchain.
    fn create_overlay(&mut self, settings: &RenderSettings) -> Result<Self::Overlay>;

    fn create_acceleration_structures(&mut self, scene: &Scene) -> Result<()>;

    fn delete_acceleration_structures(&mut self, idle: &DeviceIdle);

    /// Acquire the next swapchain image.
    ///
    /// Returns `None` when the swapchain is out of date and must be rebuilt.
    fn acquire_frame(&mut self) -> Result<Option<FrameTarget>>;

    /// Record the draw commands for one frame.
    fn render(
        &mut self,
        target: &FrameTarget,
        path: RenderPath,
        uniforms: &UniformBufferObject,
        scene: &Scene,
    ) -> Result<()>;

    /// Submit and present the frame.
    ///
    /// Returns `true` if the swapchain is suboptimal or out of date.
    fn present(&mut self, target: FrameTarget) -> Result<bool>;
}

/// The UI drawn over the rendered image.
pub trait Overlay {
    /// Draw the overlay; the UI may edit `settings` in place.
    fn render(
        &mut self,
        target: &FrameTarget,
        statistics: &Statistics,
        settings: &mut RenderSettings,
    ) -> Result<()>;

    fn wants_to_capture_keyboard(&self) -> bool;

    fn wants_to_capture_mouse(&self) -> bool;
}
