//! Per-frame orchestration.
//!
//! [`FrameDriver`] owns the render settings, the loaded scene and every
//! piece of frame state, and sequences them against a [`RenderPipeline`].
//! Each call to [`FrameDriver::draw_frame`] runs, in order:
//!
//! 1. Scene-change check, with a full teardown and rebuild on mismatch
//! 2. Accumulation reset decision and sample budget
//! 3. Frame acquisition and uniform upload
//! 4. Camera update, which invalidates the *next* frame
//! 5. Benchmark bookkeeping
//! 6. Drawing through the pipeline, then the overlay with fresh statistics

use ash::vk;
use tracer_core::{Error, Result};
use tracer_platform::{Action, InputEvent, KeyCode, MouseButton, WindowHost};
use tracer_scene::ModelViewController;
use tracing::{debug, info};

use crate::accumulation::{AccumulationCounters, Accumulator, PendingInvalidation};
use crate::benchmark::{BenchmarkController, BenchmarkStep};
use crate::pipeline::{DeviceIdle, FrameTarget, Overlay, RenderPath, RenderPipeline, Statistics};
use crate::scene_selector::SceneSelector;
use crate::settings::RenderSettings;
use crate::ubo::UniformBufferObject;

/// Camera translation speed in world units per second.
pub const CAMERA_SPEED: f64 = 10.0;

pub struct FrameDriver<P: RenderPipeline> {
    pipeline: P,
    overlay: Option<P::Overlay>,

    settings: RenderSettings,
    /// Settings as they were when the previous frame's samples were taken
    previous_settings: RenderSettings,

    scenes: SceneSelector,
    camera: ModelViewController,
    has_sky: bool,

    accumulator: Accumulator,
    invalidation: PendingInvalidation,
    benchmark: BenchmarkController,

    /// Host time of the last rendered frame
    time: f64,
    wireframe: bool,
    swapchain_dirty: bool,
    statistics: Statistics,
}

impl<P: RenderPipeline> FrameDriver<P> {
    /// Load the requested scene and build the swapchain.
    ///
    /// # Errors
    /// Fails if `settings.scene_index` is outside the registry, if the scene
    /// cannot be built, or if any pipeline call fails.
    pub fn new(
        pipeline: P,
        settings: RenderSettings,
        scenes: SceneSelector,
        host: &impl WindowHost,
    ) -> Result<Self> {
        scenes.check_index(settings.scene_index)?;

        let mut driver = Self {
            pipeline,
            overlay: None,
            previous_settings: settings.clone(),
            settings,
            scenes,
            camera: ModelViewController::new(),
            has_sky: true,
            accumulator: Accumulator::new(),
            invalidation: PendingInvalidation::default(),
            benchmark: BenchmarkController::new(),
            time: host.time(),
            wireframe: false,
            swapchain_dirty: false,
            statistics: Statistics::default(),
        };

        let idle = driver.wait_idle()?;
        driver.load_scene(driver.settings.scene_index, &idle)?;
        driver.create_swapchain(host)?;
        driver.previous_settings = driver.settings.clone();

        Ok(driver)
    }

    /// Draw one frame.
    ///
    /// Does nothing once the host is closing. A frame that changes scene
    /// only rebuilds; drawing resumes on the next call.
    pub fn draw_frame(&mut self, host: &mut impl WindowHost) -> Result<()> {
        if host.is_closing() {
            return Ok(());
        }

        if self.swapchain_dirty {
            let extent = host.framebuffer_size();
            if extent.width == 0 || extent.height == 0 {
                // Minimized
                return Ok(());
            }
            self.recreate_swapchain(&*host)?;
        }

        if self.scenes.active_index() != Some(self.settings.scene_index) {
            return self.change_scene(&*host, self.settings.scene_index);
        }

        self.settings.clamp_field_of_view();
        let force_reset = self.invalidation.take();
        let counters = self
            .accumulator
            .advance(&self.settings, &self.previous_settings, force_reset);
        self.previous_settings = self.settings.clone();

        let Some(target) = self.pipeline.acquire_frame()? else {
            debug!("Swapchain out of date on acquire");
            self.swapchain_dirty = true;
            return Ok(());
        };

        // The pose is latched here, before this frame's camera update
        let uniforms = UniformBufferObject::new(
            self.camera.model_view(),
            self.aspect_ratio(),
            &self.settings,
            counters,
            self.has_sky,
        );

        self.render(host, &target, &uniforms, counters)?;

        if self.pipeline.present(target)? {
            debug!("Swapchain suboptimal on present");
            self.swapchain_dirty = true;
        }

        Ok(())
    }

    fn render(
        &mut self,
        host: &mut impl WindowHost,
        target: &FrameTarget,
        uniforms: &UniformBufferObject,
        counters: AccumulationCounters,
    ) -> Result<()> {
        let previous_time = self.time;
        self.time = host.time();
        let time_delta = self.time - previous_time;

        let moved = self.camera.update_camera(CAMERA_SPEED, time_delta);
        self.invalidation.merge(moved);

        let benchmark = self.benchmark.update(
            &mut self.settings,
            self.scenes.scene_count(),
            self.scenes.scene_name(),
            self.time,
            previous_time,
            counters.samples_this_frame,
        );
        if benchmark.step == BenchmarkStep::Terminate {
            host.close();
        }

        let path = if self.settings.is_ray_traced {
            RenderPath::RayTraced
        } else {
            RenderPath::Rasterized {
                wireframe: self.wireframe,
            }
        };
        let scene = self
            .scenes
            .scene()
            .ok_or_else(|| Error::Internal("no scene is loaded".to_string()))?;
        self.pipeline.render(target, path, uniforms, scene)?;

        self.statistics = self.frame_statistics(&*host, time_delta, counters);
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.render(target, &self.statistics, &mut self.settings)?;
        }

        Ok(())
    }

    fn frame_statistics(
        &self,
        host: &impl WindowHost,
        time_delta: f64,
        counters: AccumulationCounters,
    ) -> Statistics {
        let mut statistics = Statistics {
            framebuffer_size: host.framebuffer_size(),
            ..Statistics::default()
        };
        // Rates need a positive frame time; the sample count does not
        let has_time = time_delta > 0.0;
        if has_time {
            statistics.frame_rate = (1.0 / time_delta) as f32;
        }
        if self.settings.is_ray_traced {
            statistics.total_samples = counters.total_samples;
            if has_time {
                let extent = self.pipeline.swapchain_extent();
                let pixels = f64::from(extent.width) * f64::from(extent.height);
                statistics.ray_rate = (pixels * f64::from(counters.samples_this_frame)
                    / (time_delta * 1_000_000_000.0)) as f32;
            }
        }
        statistics
    }

    fn aspect_ratio(&self) -> f32 {
        let extent = self.pipeline.swapchain_extent();
        extent.width as f32 / extent.height.max(1) as f32
    }

    fn wait_idle(&mut self) -> Result<DeviceIdle> {
        self.pipeline.wait_idle()?;
        Ok(DeviceIdle::new())
    }

    /// Tear down everything tied to the current scene and load `index`.
    fn change_scene(&mut self, host: &impl WindowHost, index: usize) -> Result<()> {
        // Validated before anything is torn down
        self.scenes.check_index(index)?;

        let idle = self.wait_idle()?;
        self.delete_swapchain(&idle);
        self.pipeline.delete_acceleration_structures(&idle);
        self.load_scene(index, &idle)?;
        self.create_swapchain(host)
    }

    /// Load scene `index`, reset everything derived from the old one and
    /// build its acceleration structures.
    fn load_scene(&mut self, index: usize, idle: &DeviceIdle) -> Result<()> {
        let camera = self.scenes.load(index, idle)?;

        self.settings.apply_camera_state(&camera);
        self.camera.reset(camera.model_view);
        self.has_sky = camera.has_sky;
        self.benchmark.reset_scene();
        self.invalidation.invalidate();

        let scene = self
            .scenes
            .scene()
            .ok_or_else(|| Error::Internal("scene vanished after load".to_string()))?;
        self.pipeline.create_acceleration_structures(scene)?;
        self.scenes.mark_resident()
    }

    fn create_swapchain(&mut self, host: &impl WindowHost) -> Result<()> {
        let extent = host.framebuffer_size();
        self.pipeline.create_swapchain(extent)?;
        self.overlay = Some(self.pipeline.create_overlay(&self.settings)?);
        self.invalidation.invalidate();
        self.swapchain_dirty = false;

        self.check_framebuffer_size(host)
    }

    fn delete_swapchain(&mut self, idle: &DeviceIdle) {
        self.overlay = None;
        self.pipeline.delete_swapchain(idle);
    }

    fn recreate_swapchain(&mut self, host: &impl WindowHost) -> Result<()> {
        let idle = self.wait_idle()?;
        self.delete_swapchain(&idle);
        self.create_swapchain(host)
    }

    /// Benchmark results are only comparable at the exact requested
    /// resolution.
    fn check_framebuffer_size(&self, host: &impl WindowHost) -> Result<()> {
        let config = host.config();
        if !(self.settings.benchmark && config.fullscreen) {
            return Ok(());
        }

        let actual = host.framebuffer_size();
        if actual.width != config.width || actual.height != config.height {
            return Err(Error::FramebufferSizeMismatch {
                requested: (config.width, config.height),
                actual: (actual.width, actual.height),
            });
        }
        Ok(())
    }

    /// Release the swapchain, acceleration structures and scene.
    pub fn shutdown(&mut self) -> Result<()> {
        let idle = self.wait_idle()?;
        self.delete_swapchain(&idle);
        self.pipeline.delete_acceleration_structures(&idle);
        self.scenes.unload(&idle);
        info!("Frame driver shut down");
        Ok(())
    }

    /// The framebuffer was resized; rebuild the swapchain next frame.
    pub fn on_resize(&mut self) {
        self.swapchain_dirty = true;
    }

    /// Route an input event to the matching handler.
    pub fn handle_input(&mut self, host: &mut impl WindowHost, event: InputEvent) {
        match event {
            InputEvent::Key { key, action } => self.on_key(host, key, action),
            InputEvent::CursorMoved { x, y } => self.on_cursor_position(x, y),
            InputEvent::MouseButton { button, action } => self.on_mouse_button(button, action),
        }
    }

    pub fn on_key(&mut self, host: &mut impl WindowHost, key: KeyCode, action: Action) {
        if self.overlay_captures_keyboard() {
            return;
        }

        if action == Action::Press {
            if key == KeyCode::Escape {
                host.close();
            }

            if !self.settings.benchmark {
                match key {
                    KeyCode::F1 => self.settings.show_settings = !self.settings.show_settings,
                    KeyCode::F2 => self.settings.show_overlay = !self.settings.show_overlay,
                    KeyCode::KeyR => self.settings.is_ray_traced = !self.settings.is_ray_traced,
                    KeyCode::KeyP => self.wireframe = !self.wireframe,
                    _ => {}
                }
            }
        }

        if !self.settings.benchmark {
            let moved = self.camera.on_key(key, action);
            self.invalidation.merge(moved);
        }
    }

    pub fn on_cursor_position(&mut self, x: f64, y: f64) {
        if self.settings.benchmark
            || self.overlay_captures_keyboard()
            || self.overlay_captures_mouse()
        {
            return;
        }
        let moved = self.camera.on_cursor_position(x, y);
        self.invalidation.merge(moved);
    }

    pub fn on_mouse_button(&mut self, button: MouseButton, action: Action) {
        if self.settings.benchmark || self.overlay_captures_mouse() {
            return;
        }
        let moved = self.camera.on_mouse_button(button, action);
        self.invalidation.merge(moved);
    }

    fn overlay_captures_keyboard(&self) -> bool {
        self.overlay
            .as_ref()
            .is_some_and(|overlay| overlay.wants_to_capture_keyboard())
    }

    fn overlay_captures_mouse(&self) -> bool {
        self.overlay
            .as_ref()
            .is_some_and(|overlay| overlay.wants_to_capture_mouse())
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Settings for synchronous edits between frames.
    pub fn settings_mut(&mut self) -> &mut RenderSettings {
        &mut self.settings
    }

    pub fn counters(&self) -> AccumulationCounters {
        self.accumulator.counters()
    }

    pub fn is_invalidated(&self) -> bool {
        self.invalidation.is_pending()
    }

    pub fn benchmark(&self) -> &BenchmarkController {
        &self.benchmark
    }

    pub fn scenes(&self) -> &SceneSelector {
        &self.scenes
    }

    pub fn camera(&self) -> &ModelViewController {
        &self.camera
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    pub fn is_wireframe(&self) -> bool {
        self.wireframe
    }

    pub fn swapchain_extent(&self) -> vk::Extent2D {
        self.pipeline.swapchain_extent()
    }
}
