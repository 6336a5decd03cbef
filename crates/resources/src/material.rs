//! Material definitions shared with the ray tracing shaders.

use bytemuck::{Pod, Zeroable};
use glam::Vec4;

/// Scattering model of a material.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaterialModel {
    Lambertian = 0,
    Metallic = 1,
    Dielectric = 2,
    Isotropic = 3,
    DiffuseLight = 4,
}

/// Material properties, laid out as the shader storage buffer expects.
///
/// # Memory Layout
///
/// - Offset 0: diffuse color (16 bytes)
/// - Offset 16: diffuse texture id, -1 for none (4 bytes)
/// - Offset 20: fuzziness (4 bytes)
/// - Offset 24: refraction index (4 bytes)
/// - Offset 28: material model (4 bytes)
/// - Total size: 32 bytes
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Material {
    /// Base color (albedo or emitted radiance)
    pub diffuse: Vec4,
    /// Index into the scene textures, or -1
    pub diffuse_texture_id: i32,
    /// Metal roughness (0.0 = perfect mirror)
    pub fuzziness: f32,
    /// Index of refraction for dielectrics
    pub refraction_index: f32,
    /// Raw [`MaterialModel`] discriminant
    pub material_model: u32,
}

impl Material {
    /// Size of the struct in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    pub fn lambertian(diffuse: Vec4, texture_id: i32) -> Self {
        Self::with_model(diffuse, texture_id, 0.0, 0.0, MaterialModel::Lambertian)
    }

    pub fn metallic(diffuse: Vec4, fuzziness: f32, texture_id: i32) -> Self {
        Self::with_model(diffuse, texture_id, fuzziness, 0.0, MaterialModel::Metallic)
    }

    pub fn dielectric(refraction_index: f32, texture_id: i32) -> Self {
        Self::with_model(
            Vec4::new(0.7, 0.7, 1.0, 1.0),
            texture_id,
            0.0,
            refraction_index,
            MaterialModel::Dielectric,
        )
    }

    pub fn isotropic(diffuse: Vec4, texture_id: i32) -> Self {
        Self::with_model(diffuse, texture_id, 0.0, 0.0, MaterialModel::Isotropic)
    }

    pub fn diffuse_light(diffuse: Vec4, texture_id: i32) -> Self {
        Self::with_model(diffuse, texture_id, 0.0, 0.0, MaterialModel::DiffuseLight)
    }

    fn with_model(
        diffuse: Vec4,
        diffuse_texture_id: i32,
        fuzziness: f32,
        refraction_index: f32,
        model: MaterialModel,
    ) -> Self {
        Self {
            diffuse,
            diffuse_texture_id,
            fuzziness,
            refraction_index,
            material_model: model as u32,
        }
    }

    /// The scattering model of this material.
    pub fn model(&self) -> MaterialModel {
        match self.material_model {
            1 => MaterialModel::Metallic,
            2 => MaterialModel::Dielectric,
            3 => MaterialModel::Isotropic,
            4 => MaterialModel::DiffuseLight,
            _ => MaterialModel::Lambertian,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::lambertian(Vec4::ONE, -1)
    }
}
