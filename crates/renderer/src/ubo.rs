//! Per-frame uniform data for the ray tracing and raster shaders.
//!
//! The structure must match the shader uniform block layout exactly.
//! It uses `#[repr(C)]` for predictable memory layout and implements
//! `Pod` and `Zeroable` for safe byte casting.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::accumulation::AccumulationCounters;
use crate::settings::RenderSettings;

const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 10000.0;

/// Frame uniform buffer data.
///
/// # Memory Layout
///
/// - Offset 0: model-view matrix (64 bytes)
/// - Offset 64: projection matrix (64 bytes)
/// - Offset 128: inverse model-view (64 bytes)
/// - Offset 192: inverse projection (64 bytes)
/// - Offset 256: aperture, focus distance (8 bytes)
/// - Offset 264: sample counts, bounces, seed (16 bytes)
/// - Offset 280: gamma and sky flags (8 bytes)
/// - Total size: 288 bytes
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct UniformBufferObject {
    pub model_view: Mat4,
    pub projection: Mat4,
    pub model_view_inverse: Mat4,
    pub projection_inverse: Mat4,
    pub aperture: f32,
    pub focus_distance: f32,
    pub total_number_of_samples: u32,
    pub number_of_samples: u32,
    pub number_of_bounces: u32,
    pub random_seed: u32,
    /// Boolean stored as u32 for shader compatibility
    pub gamma_correction: u32,
    /// Boolean stored as u32 for shader compatibility
    pub has_sky: u32,
}

impl UniformBufferObject {
    /// Size of the struct in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Assemble the frame uniforms.
    ///
    /// `model_view` must be the camera pose latched before this frame's
    /// camera update so the image matches the accumulation decision.
    pub fn new(
        model_view: Mat4,
        aspect_ratio: f32,
        settings: &RenderSettings,
        counters: AccumulationCounters,
        has_sky: bool,
    ) -> Self {
        let mut projection = Mat4::perspective_rh(
            settings.field_of_view.to_radians(),
            aspect_ratio,
            Z_NEAR,
            Z_FAR,
        );
        // Vulkan clip space has Y pointing down
        projection.y_axis.y *= -1.0;

        Self {
            model_view,
            projection,
            model_view_inverse: model_view.inverse(),
            projection_inverse: projection.inverse(),
            aperture: settings.aperture,
            focus_distance: settings.focus_distance,
            total_number_of_samples: counters.total_samples,
            number_of_samples: counters.samples_this_frame,
            number_of_bounces: settings.number_of_bounces,
            random_seed: 1,
            gamma_correction: settings.gamma_correction as u32,
            has_sky: has_sky as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::{Vec3, Vec4};

    use super::*;

    #[test]
    fn test_ubo_size() {
        // 4 Mat4 (4 * 64) + 2 f32 + 6 u32 = 288 bytes
        assert_eq!(UniformBufferObject::SIZE, 288);
    }

    #[test]
    fn test_ubo_alignment() {
        // Mat4 requires 16-byte alignment
        assert_eq!(std::mem::align_of::<UniformBufferObject>(), 16);
    }

    #[test]
    fn test_ubo_new() {
        let model_view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        let settings = RenderSettings {
            aperture: 0.2,
            focus_distance: 5.0,
            number_of_bounces: 4,
            gamma_correction: false,
            ..RenderSettings::default()
        };
        let counters = AccumulationCounters {
            total_samples: 24,
            samples_this_frame: 8,
        };

        let ubo = UniformBufferObject::new(model_view, 16.0 / 9.0, &settings, counters, true);

        assert_eq!(ubo.model_view, model_view);
        assert!(ubo.model_view_inverse.abs_diff_eq(model_view.inverse(), 1e-5));
        assert_eq!(ubo.aperture, 0.2);
        assert_eq!(ubo.focus_distance, 5.0);
        assert_eq!(ubo.total_number_of_samples, 24);
        assert_eq!(ubo.number_of_samples, 8);
        assert_eq!(ubo.number_of_bounces, 4);
        assert_eq!(ubo.random_seed, 1);
        assert_eq!(ubo.gamma_correction, 0);
        assert_eq!(ubo.has_sky, 1);
    }

    #[test]
    fn test_projection_flips_y() {
        let settings = RenderSettings::default();
        let ubo = UniformBufferObject::new(
            Mat4::IDENTITY,
            1.0,
            &settings,
            AccumulationCounters::default(),
            false,
        );

        // A point above the view axis lands in the upper half of Vulkan clip space
        let clip = ubo.projection * Vec4::new(0.0, 1.0, -5.0, 1.0);
        assert!(clip.y / clip.w < 0.0);
        assert!(
            (ubo.projection * ubo.projection_inverse).abs_diff_eq(Mat4::IDENTITY, 1e-4)
        );
    }

    #[test]
    fn test_ubo_pod_zeroable() {
        let ubo: UniformBufferObject = Zeroable::zeroed();
        let bytes: &[u8] = bytemuck::bytes_of(&ubo);
        assert_eq!(bytes.len(), UniformBufferObject::SIZE);
        assert!(bytes.iter().all(|&b| b == 0));
    }
}
