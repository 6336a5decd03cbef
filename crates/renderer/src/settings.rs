//! User-mutable render settings.

use tracer_resources::CameraInitialState;

/// Render configuration edited by the UI and keyboard, read every frame.
///
/// The frame driver keeps the previous frame's value and compares the two
/// with [`RenderSettings::requires_accumulation_reset`].
#[derive(Clone, Debug, PartialEq)]
pub struct RenderSettings {
    // Benchmark
    pub benchmark: bool,
    /// Advance through every remaining scene instead of stopping after one
    pub benchmark_next_scenes: bool,
    /// Maximum time spent on one scene, in seconds
    pub benchmark_max_time: u32,

    // Scene
    pub scene_index: usize,

    // Renderer
    pub is_ray_traced: bool,
    pub accumulate_rays: bool,
    /// Samples taken per pixel per frame
    pub number_of_samples: u32,
    pub number_of_bounces: u32,
    /// Samples per pixel at which accumulation stops
    pub max_number_of_samples: u32,

    // Camera
    /// Vertical field of view in degrees
    pub field_of_view: f32,
    pub aperture: f32,
    pub focus_distance: f32,
    pub gamma_correction: bool,

    // UI
    pub show_settings: bool,
    pub show_overlay: bool,
}

impl RenderSettings {
    pub const FIELD_OF_VIEW_MIN: f32 = 10.0;
    pub const FIELD_OF_VIEW_MAX: f32 = 90.0;

    /// Whether samples accumulated under `previous` are invalid under `self`.
    ///
    /// Every field that changes the rendered image counts; UI visibility,
    /// benchmark flags and sample budgets do not.
    pub fn requires_accumulation_reset(&self, previous: &RenderSettings) -> bool {
        self.is_ray_traced != previous.is_ray_traced
            || self.accumulate_rays != previous.accumulate_rays
            || self.number_of_bounces != previous.number_of_bounces
            || self.field_of_view != previous.field_of_view
            || self.aperture != previous.aperture
            || self.focus_distance != previous.focus_distance
            || self.gamma_correction != previous.gamma_correction
            || self.scene_index != previous.scene_index
    }

    /// Copy a scene's optical defaults into the settings.
    pub fn apply_camera_state(&mut self, camera: &CameraInitialState) {
        self.field_of_view = camera.field_of_view;
        self.aperture = camera.aperture;
        self.focus_distance = camera.focus_distance;
        self.gamma_correction = camera.gamma_correction;
        self.clamp_field_of_view();
    }

    /// Keep the field of view within the range the UI slider offers.
    pub fn clamp_field_of_view(&mut self) {
        self.field_of_view = self
            .field_of_view
            .clamp(Self::FIELD_OF_VIEW_MIN, Self::FIELD_OF_VIEW_MAX);
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            benchmark: false,
            benchmark_next_scenes: false,
            benchmark_max_time: 600,
            scene_index: 1,
            is_ray_traced: true,
            accumulate_rays: true,
            number_of_samples: 8,
            number_of_bounces: 16,
            max_number_of_samples: 64 * 1024,
            field_of_view: 90.0,
            aperture: 0.0,
            focus_distance: 10.0,
            gamma_correction: true,
            show_settings: true,
            show_overlay: true,
        }
    }
}
