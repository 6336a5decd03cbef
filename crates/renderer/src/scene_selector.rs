//! Scene loading by registry index.

use std::path::PathBuf;

use tracer_core::{Error, Result};
use tracer_resources::{CameraInitialState, SamplerConfig, Scene, SceneEntry, Texture};
use tracing::{debug, info};

use crate::pipeline::DeviceIdle;

/// Residency of the single scene the renderer owns.
#[derive(Debug, Default)]
pub enum SceneSlot {
    #[default]
    Unloaded,
    /// Built on the CPU; acceleration structures not yet created
    Loading {
        index: usize,
        scene: Scene,
        camera: CameraInitialState,
    },
    /// Resident on the GPU
    Loaded {
        index: usize,
        scene: Scene,
        camera: CameraInitialState,
    },
}

/// Owns the active scene and builds new ones from the registry.
pub struct SceneSelector {
    registry: &'static [SceneEntry],
    fallback_texture: PathBuf,
    slot: SceneSlot,
}

impl SceneSelector {
    /// `fallback_texture` is loaded for scenes that ship no textures.
    pub fn new(registry: &'static [SceneEntry], fallback_texture: impl Into<PathBuf>) -> Self {
        Self {
            registry,
            fallback_texture: fallback_texture.into(),
            slot: SceneSlot::Unloaded,
        }
    }

    pub fn scene_count(&self) -> usize {
        self.registry.len()
    }

    /// Look up a registry entry, failing on an out-of-range index.
    pub fn check_index(&self, index: usize) -> Result<&'static SceneEntry> {
        self.registry.get(index).ok_or(Error::SceneIndexOutOfRange {
            index,
            count: self.registry.len(),
        })
    }

    /// Build scene `index` and make it the owned scene.
    ///
    /// Everything that can fail runs before the old scene is dropped, so on
    /// error the previous slot is left untouched. On success the slot is
    /// `Loading` until [`SceneSelector::mark_resident`].
    pub fn load(&mut self, index: usize, _idle: &DeviceIdle) -> Result<CameraInitialState> {
        let entry = self.check_index(index)?;
        info!("Loading scene #{} '{}'", index, entry.name);

        let assets = (entry.factory)()?;
        let mut textures = assets.textures;
        if textures.is_empty() {
            debug!(
                "Scene '{}' has no textures, using {}",
                entry.name,
                self.fallback_texture.display()
            );
            textures.push(Texture::load_texture(
                &self.fallback_texture,
                SamplerConfig::default(),
            )?);
        }
        let scene = Scene::new(entry.name, assets.models, textures)?;
        let camera = assets.camera;

        // The old scene is released before the new one takes the slot
        self.slot = SceneSlot::Unloaded;
        self.slot = SceneSlot::Loading {
            index,
            scene,
            camera,
        };

        Ok(camera)
    }

    /// Record that the pipeline built acceleration structures for the scene.
    pub fn mark_resident(&mut self) -> Result<()> {
        match std::mem::take(&mut self.slot) {
            SceneSlot::Loading {
                index,
                scene,
                camera,
            } => {
                self.slot = SceneSlot::Loaded {
                    index,
                    scene,
                    camera,
                };
                Ok(())
            }
            other => {
                self.slot = other;
                Err(Error::Internal(
                    "only a loading scene can become resident".to_string(),
                ))
            }
        }
    }

    /// Drop the owned scene.
    pub fn unload(&mut self, _idle: &DeviceIdle) {
        if let Some(index) = self.active_index() {
            debug!("Unloading scene #{}", index);
        }
        self.slot = SceneSlot::Unloaded;
    }

    pub fn slot(&self) -> &SceneSlot {
        &self.slot
    }

    pub fn scene(&self) -> Option<&Scene> {
        match &self.slot {
            SceneSlot::Unloaded => None,
            SceneSlot::Loading { scene, .. } | SceneSlot::Loaded { scene, .. } => Some(scene),
        }
    }

    pub fn camera(&self) -> Option<&CameraInitialState> {
        match &self.slot {
            SceneSlot::Unloaded => None,
            SceneSlot::Loading { camera, .. } | SceneSlot::Loaded { camera, .. } => Some(camera),
        }
    }

    pub fn active_index(&self) -> Option<usize> {
        match self.slot {
            SceneSlot::Unloaded => None,
            SceneSlot::Loading { index, .. } | SceneSlot::Loaded { index, .. } => Some(index),
        }
    }

    pub fn is_resident(&self) -> bool {
        matches!(self.slot, SceneSlot::Loaded { .. })
    }

    /// Name of the owned scene, or an empty string when none is loaded.
    pub fn scene_name(&self) -> &'static str {
        self.active_index()
            .and_then(|index| self.registry.get(index))
            .map_or("", |entry| entry.name)
    }
}
