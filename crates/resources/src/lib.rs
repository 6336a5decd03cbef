//! Asset definitions and the scene registry.
//!
//! This crate provides the asset collaborators of the frame driver:
//! - Procedural models (boxes, spheres, Cornell box) and materials
//! - Texture loading with sampler configuration
//! - The [`Scene`] handle owning one scene's geometry and textures
//! - The static, ordered [`ALL_SCENES`] registry

mod error;

pub mod material;
pub mod model;
pub mod scene;
pub mod scene_list;
pub mod texture;

pub use error::{ResourceError, ResourceResult};
pub use material::{Material, MaterialModel};
pub use model::{Model, Sphere, Vertex};
pub use scene::Scene;
pub use scene_list::{ALL_SCENES, CameraInitialState, SceneAssets, SceneEntry, SceneFactory};
pub use texture::{AddressMode, Filter, SamplerConfig, Texture};
