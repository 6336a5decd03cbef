//! The scene handle.

use tracing::debug;

use crate::error::{ResourceError, ResourceResult};
use crate::model::Model;
use crate::texture::Texture;

/// Geometry and textures of exactly one loaded scene.
///
/// The frame driver owns the only live `Scene` and lends it to the pipeline
/// layer, which builds its GPU buffers and acceleration structures from it.
#[derive(Debug)]
pub struct Scene {
    models: Vec<Model>,
    textures: Vec<Texture>,
}

impl Scene {
    /// Create a scene handle.
    ///
    /// # Errors
    /// A scene needs at least one model and one texture; the pipeline layout
    /// assumes a non-empty texture array.
    pub fn new(name: &str, models: Vec<Model>, textures: Vec<Texture>) -> ResourceResult<Self> {
        if models.is_empty() {
            return Err(ResourceError::NoModels(name.to_string()));
        }
        if textures.is_empty() {
            return Err(ResourceError::NoTextures);
        }

        let scene = Self { models, textures };
        debug!(
            "Scene '{}': {} models, {} textures, {} vertices, {} procedurals",
            name,
            scene.models.len(),
            scene.textures.len(),
            scene.vertex_count(),
            scene.procedural_count()
        );
        Ok(scene)
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    pub fn textures(&self) -> &[Texture] {
        &self.textures
    }

    /// Whether any model needs procedural (intersection shader) geometry.
    pub fn has_procedurals(&self) -> bool {
        self.procedural_count() > 0
    }

    pub fn procedural_count(&self) -> usize {
        self.models
            .iter()
            .filter(|model| model.procedural().is_some())
            .count()
    }

    pub fn vertex_count(&self) -> usize {
        self.models.iter().map(|model| model.vertices().len()).sum()
    }

    pub fn index_count(&self) -> usize {
        self.models.iter().map(|model| model.indices().len()).sum()
    }
}
