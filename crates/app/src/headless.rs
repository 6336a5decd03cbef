//! A pipeline that drives the frame loop without touching the GPU.
//!
//! It honours the create/destroy contracts of [`RenderPipeline`] and logs
//! what a Vulkan backend would dispatch, so benchmark runs and scene
//! switching behave exactly as they would with a device attached.

use ash::vk;
use tracer_core::{Error, Result};
use tracer_renderer::{
    DeviceIdle, FrameTarget, Overlay, RenderPath, RenderPipeline, RenderSettings, Statistics,
    UniformBufferObject,
};
use tracer_resources::Scene;
use tracing::{debug, info, trace};

/// Number of swapchain images cycled through.
const IMAGE_COUNT: u32 = 3;

pub struct HeadlessPipeline {
    present_mode: vk::PresentModeKHR,
    extent: Option<vk::Extent2D>,
    acceleration_structures: bool,
    image_index: u32,
    frames: u64,
}

impl HeadlessPipeline {
    pub fn new(present_mode: vk::PresentModeKHR) -> Self {
        Self {
            present_mode,
            extent: None,
            acceleration_structures: false,
            image_index: 0,
            frames: 0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl RenderPipeline for HeadlessPipeline {
    type Overlay = LogOverlay;

    fn wait_idle(&mut self) -> Result<()> {
        trace!("Device idle");
        Ok(())
    }

    fn create_swapchain(&mut self, extent: vk::Extent2D) -> Result<()> {
        if self.extent.is_some() {
            return Err(Error::Pipeline("swapchain already exists".to_string()));
        }
        if !self.acceleration_structures {
            return Err(Error::Pipeline(
                "swapchain requires acceleration structures".to_string(),
            ));
        }
        info!(
            "Swapchain created: {}x{} ({:?})",
            extent.width, extent.height, self.present_mode
        );
        self.extent = Some(extent);
        self.image_index = 0;
        Ok(())
    }

    fn delete_swapchain(&mut self, _idle: &DeviceIdle) {
        if self.extent.take().is_some() {
            debug!("Swapchain destroyed");
        }
    }

    fn swapchain_extent(&self) -> vk::Extent2D {
        self.extent.unwrap_or_default()
    }

    fn create_overlay(&mut self, settings: &RenderSettings) -> Result<LogOverlay> {
        Ok(LogOverlay::new(settings.show_overlay))
    }

    fn create_acceleration_structures(&mut self, scene: &Scene) -> Result<()> {
        info!(
            "Building acceleration structures: {} models, {} vertices, {} indices",
            scene.models().len(),
            scene.vertex_count(),
            scene.index_count()
        );
        if scene.has_procedurals() {
            debug!("Adding {} procedural AABBs", scene.procedural_count());
        }
        self.acceleration_structures = true;
        Ok(())
    }

    fn delete_acceleration_structures(&mut self, _idle: &DeviceIdle) {
        if self.acceleration_structures {
            debug!("Acceleration structures destroyed");
        }
        self.acceleration_structures = false;
    }

    fn acquire_frame(&mut self) -> Result<Option<FrameTarget>> {
        if self.extent.is_none() {
            return Ok(None);
        }
        Ok(Some(FrameTarget {
            command_buffer: vk::CommandBuffer::null(),
            image_index: self.image_index,
        }))
    }

    fn render(
        &mut self,
        target: &FrameTarget,
        path: RenderPath,
        uniforms: &UniformBufferObject,
        scene: &Scene,
    ) -> Result<()> {
        if !self.acceleration_structures && path == RenderPath::RayTraced {
            return Err(Error::Pipeline(
                "ray dispatch without acceleration structures".to_string(),
            ));
        }
        let bytes = bytemuck::bytes_of(uniforms);
        trace!(
            "Image {}: {:?} over {} models, {} uniform bytes, {} samples",
            target.image_index,
            path,
            scene.models().len(),
            bytes.len(),
            uniforms.number_of_samples
        );
        Ok(())
    }

    fn present(&mut self, _target: FrameTarget) -> Result<bool> {
        self.image_index = (self.image_index + 1) % IMAGE_COUNT;
        self.frames += 1;
        Ok(false)
    }
}

/// Prints frame statistics in place of a UI.
pub struct LogOverlay {
    enabled: bool,
    frames: u64,
}

impl LogOverlay {
    /// Frames between two statistics lines.
    const LOG_INTERVAL: u64 = 240;

    fn new(enabled: bool) -> Self {
        Self { enabled, frames: 0 }
    }
}

impl Overlay for LogOverlay {
    fn render(
        &mut self,
        _target: &FrameTarget,
        statistics: &Statistics,
        settings: &mut RenderSettings,
    ) -> Result<()> {
        self.frames += 1;
        if !(self.enabled && settings.show_overlay) || self.frames % Self::LOG_INTERVAL != 0 {
            return Ok(());
        }
        info!(
            "{}x{} | {:.1} fps | {:.3} Grays/s | {} samples",
            statistics.framebuffer_size.width,
            statistics.framebuffer_size.height,
            statistics.frame_rate,
            statistics.ray_rate,
            statistics.total_samples
        );
        Ok(())
    }

    fn wants_to_capture_keyboard(&self) -> bool {
        false
    }

    fn wants_to_capture_mouse(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use tracer_core::Timer;
    use tracer_platform::{WindowConfig, WindowHost};
    use tracer_renderer::{FrameDriver, SceneSelector};
    use tracer_resources::ALL_SCENES;

    use super::*;

    struct ClockHost {
        clock: Timer,
        offset: f64,
        config: WindowConfig,
        closing: bool,
    }

    impl WindowHost for ClockHost {
        fn time(&self) -> f64 {
            self.offset + self.clock.elapsed_secs_f64()
        }

        fn framebuffer_size(&self) -> vk::Extent2D {
            vk::Extent2D {
                width: self.config.width,
                height: self.config.height,
            }
        }

        fn config(&self) -> &WindowConfig {
            &self.config
        }

        fn close(&mut self) {
            self.closing = true;
        }

        fn is_closing(&self) -> bool {
            self.closing
        }
    }

    fn placeholder() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../assets/textures/white.png")
    }

    #[test]
    fn test_benchmark_runs_every_scene_to_completion() {
        let mut host = ClockHost {
            clock: Timer::new(),
            offset: 0.0,
            config: WindowConfig {
                width: 64,
                height: 64,
                ..WindowConfig::default()
            },
            closing: false,
        };
        let settings = RenderSettings {
            benchmark: true,
            benchmark_next_scenes: true,
            scene_index: 0,
            max_number_of_samples: 16,
            number_of_samples: 8,
            ..RenderSettings::default()
        };
        let mut driver = FrameDriver::new(
            HeadlessPipeline::new(vk::PresentModeKHR::FIFO),
            settings,
            SceneSelector::new(ALL_SCENES, placeholder()),
            &host,
        )
        .unwrap();

        // Every scene converges after two frames, so this terminates quickly
        for _ in 0..100 {
            host.offset += 0.01;
            driver.draw_frame(&mut host).unwrap();
            if host.is_closing() {
                break;
            }
        }

        assert!(host.is_closing());
        assert_eq!(driver.settings().scene_index, ALL_SCENES.len());
        assert_eq!(driver.scenes().active_index(), Some(ALL_SCENES.len() - 1));
        assert!(driver.pipeline().frames() > 0);
        driver.shutdown().unwrap();
    }

    #[test]
    fn test_swapchain_requires_acceleration_structures() {
        let mut pipeline = HeadlessPipeline::new(vk::PresentModeKHR::MAILBOX);
        let extent = vk::Extent2D {
            width: 8,
            height: 8,
        };

        assert!(pipeline.create_swapchain(extent).is_err());
        assert_eq!(pipeline.acquire_frame().unwrap(), None);
        assert_eq!(pipeline.swapchain_extent(), vk::Extent2D::default());
    }

    #[test]
    fn test_overlay_never_captures() {
        let overlay = LogOverlay::new(true);
        assert!(!overlay.wants_to_capture_keyboard());
        assert!(!overlay.wants_to_capture_mouse());
    }
}
