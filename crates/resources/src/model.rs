//! Procedural model construction.
//!
//! Models carry triangle meshes for the rasterizer and, for spheres, an
//! optional analytic [`Sphere`] that the ray tracer intersects directly.

use std::f32::consts::PI;

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};

use crate::material::Material;

/// Interleaved vertex as uploaded to the GPU.
///
/// # Memory Layout
///
/// - Offset 0: position (12 bytes)
/// - Offset 12: normal (12 bytes)
/// - Offset 24: texture coordinates (8 bytes)
/// - Offset 32: material index (4 bytes)
/// - Total size: 36 bytes
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tex_coord: Vec2,
    pub material_index: i32,
}

impl Vertex {
    /// Size of the struct in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();
}

/// An analytic sphere intersected by the ray tracing shaders.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    /// Axis-aligned bounding box as `(min, max)`.
    pub fn bounding_box(&self) -> (Vec3, Vec3) {
        (
            self.center - Vec3::splat(self.radius),
            self.center + Vec3::splat(self.radius),
        )
    }
}

/// A model: triangle mesh, materials and an optional procedural sphere.
#[derive(Clone, Debug, Default)]
pub struct Model {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    materials: Vec<Material>,
    procedural: Option<Sphere>,
}

impl Model {
    /// Create a model from raw mesh data.
    pub fn new(
        vertices: Vec<Vertex>,
        indices: Vec<u32>,
        materials: Vec<Material>,
        procedural: Option<Sphere>,
    ) -> Self {
        Self {
            vertices,
            indices,
            materials,
            procedural,
        }
    }

    /// Create an axis-aligned box spanning `p0` (min corner) to `p1` (max corner).
    pub fn create_box(p0: Vec3, p1: Vec3, material: Material) -> Self {
        let (x0, y0, z0) = (p0.x, p0.y, p0.z);
        let (x1, y1, z1) = (p1.x, p1.y, p1.z);

        let mut mesh = MeshBuilder::default();
        // +X, -X, +Y, -Y, +Z, -Z, each wound counter-clockwise seen from outside
        mesh.quad(
            [
                Vec3::new(x1, y0, z1),
                Vec3::new(x1, y0, z0),
                Vec3::new(x1, y1, z0),
                Vec3::new(x1, y1, z1),
            ],
            0,
        );
        mesh.quad(
            [
                Vec3::new(x0, y0, z0),
                Vec3::new(x0, y0, z1),
                Vec3::new(x0, y1, z1),
                Vec3::new(x0, y1, z0),
            ],
            0,
        );
        mesh.quad(
            [
                Vec3::new(x0, y1, z1),
                Vec3::new(x1, y1, z1),
                Vec3::new(x1, y1, z0),
                Vec3::new(x0, y1, z0),
            ],
            0,
        );
        mesh.quad(
            [
                Vec3::new(x0, y0, z0),
                Vec3::new(x1, y0, z0),
                Vec3::new(x1, y0, z1),
                Vec3::new(x0, y0, z1),
            ],
            0,
        );
        mesh.quad(
            [
                Vec3::new(x0, y0, z1),
                Vec3::new(x1, y0, z1),
                Vec3::new(x1, y1, z1),
                Vec3::new(x0, y1, z1),
            ],
            0,
        );
        mesh.quad(
            [
                Vec3::new(x1, y0, z0),
                Vec3::new(x0, y0, z0),
                Vec3::new(x0, y1, z0),
                Vec3::new(x1, y1, z0),
            ],
            0,
        );

        mesh.build(vec![material], None)
    }

    /// Create a tessellated sphere.
    ///
    /// When `is_procedural` is set the model also carries an analytic sphere,
    /// which the ray tracer prefers over the tessellated mesh.
    pub fn create_sphere(center: Vec3, radius: f32, material: Material, is_procedural: bool) -> Self {
        const SLICES: u32 = 32;
        const STACKS: u32 = 16;

        let mut vertices = Vec::with_capacity(((STACKS + 1) * (SLICES + 1)) as usize);

        for j in 0..=STACKS {
            let phi = PI * j as f32 / STACKS as f32;
            let y = -phi.cos();
            let ring = phi.sin();

            for i in 0..=SLICES {
                let theta = 2.0 * PI * i as f32 / SLICES as f32;
                let normal = Vec3::new(ring * theta.sin(), y, ring * theta.cos());

                vertices.push(Vertex {
                    position: center + radius * normal,
                    normal,
                    tex_coord: Vec2::new(
                        i as f32 / SLICES as f32,
                        1.0 - j as f32 / STACKS as f32,
                    ),
                    material_index: 0,
                });
            }
        }

        let mut indices = Vec::with_capacity((STACKS * SLICES * 6) as usize);
        for j in 0..STACKS {
            for i in 0..SLICES {
                let i0 = j * (SLICES + 1) + i;
                let i1 = i0 + 1;
                let i2 = i0 + SLICES + 1;
                let i3 = i2 + 1;

                indices.extend_from_slice(&[i0, i1, i2, i2, i1, i3]);
            }
        }

        let procedural = is_procedural.then_some(Sphere { center, radius });
        Self::new(vertices, indices, vec![material], procedural)
    }

    /// Create the five walls and ceiling light of a Cornell box.
    ///
    /// The box spans `[0, scale]` on X and Y and `[-scale, 0]` on Z; every
    /// face points inwards.
    pub fn create_cornell_box(scale: f32) -> Self {
        let s = scale;

        let red = Material::lambertian(Vec4::new(0.65, 0.05, 0.05, 1.0), -1);
        let green = Material::lambertian(Vec4::new(0.12, 0.45, 0.15, 1.0), -1);
        let white = Material::lambertian(Vec4::new(0.73, 0.73, 0.73, 1.0), -1);
        let light = Material::diffuse_light(Vec4::new(15.0, 15.0, 15.0, 1.0), -1);

        let mut mesh = MeshBuilder::default();

        // Floor, ceiling and back wall
        mesh.quad(
            [
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(s, 0.0, 0.0),
                Vec3::new(s, 0.0, -s),
                Vec3::new(0.0, 0.0, -s),
            ],
            2,
        );
        mesh.quad(
            [
                Vec3::new(0.0, s, 0.0),
                Vec3::new(0.0, s, -s),
                Vec3::new(s, s, -s),
                Vec3::new(s, s, 0.0),
            ],
            2,
        );
        mesh.quad(
            [
                Vec3::new(0.0, 0.0, -s),
                Vec3::new(s, 0.0, -s),
                Vec3::new(s, s, -s),
                Vec3::new(0.0, s, -s),
            ],
            2,
        );

        // Left (red) and right (green) walls
        mesh.quad(
            [
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, -s),
                Vec3::new(0.0, s, -s),
                Vec3::new(0.0, s, 0.0),
            ],
            0,
        );
        mesh.quad(
            [
                Vec3::new(s, 0.0, -s),
                Vec3::new(s, 0.0, 0.0),
                Vec3::new(s, s, 0.0),
                Vec3::new(s, s, -s),
            ],
            1,
        );

        // Ceiling light, just below the ceiling
        let x0 = s * (213.0 / 555.0);
        let x1 = s * (343.0 / 555.0);
        let z0 = -s * (332.0 / 555.0);
        let z1 = -s * (227.0 / 555.0);
        let y = s * (554.0 / 555.0);
        mesh.quad(
            [
                Vec3::new(x0, y, z1),
                Vec3::new(x0, y, z0),
                Vec3::new(x1, y, z0),
                Vec3::new(x1, y, z1),
            ],
            3,
        );

        mesh.build(vec![red, green, white, light], None)
    }

    /// Replace every material of the model with a single one.
    pub fn set_material(&mut self, material: Material) {
        self.materials = vec![material];
        for vertex in &mut self.vertices {
            vertex.material_index = 0;
        }
    }

    /// Apply a transform to every vertex (and to the procedural sphere).
    pub fn transform(&mut self, transform: Mat4) {
        let normal_matrix = Mat3::from_mat4(transform).inverse().transpose();

        for vertex in &mut self.vertices {
            vertex.position = transform.transform_point3(vertex.position);
            vertex.normal = (normal_matrix * vertex.normal).normalize_or_zero();
        }

        if let Some(sphere) = &mut self.procedural {
            let (scale, _, _) = transform.to_scale_rotation_translation();
            sphere.center = transform.transform_point3(sphere.center);
            sphere.radius *= scale.max_element();
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// The analytic sphere, if this model is procedural.
    pub fn procedural(&self) -> Option<&Sphere> {
        self.procedural.as_ref()
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Accumulates quads into a triangle mesh.
#[derive(Default)]
struct MeshBuilder {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl MeshBuilder {
    /// Add a quad whose corners are wound counter-clockwise around its normal.
    fn quad(&mut self, corners: [Vec3; 4], material_index: i32) {
        let [a, b, c, _] = corners;
        let normal = (b - a).cross(c - a).normalize_or_zero();
        let tex_coords = [
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 0.0),
        ];

        let base = self.vertices.len() as u32;
        for (position, tex_coord) in corners.into_iter().zip(tex_coords) {
            self.vertices.push(Vertex {
                position,
                normal,
                tex_coord,
                material_index,
            });
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    fn build(self, materials: Vec<Material>, procedural: Option<Sphere>) -> Model {
        Model::new(self.vertices, self.indices, materials, procedural)
    }
}
