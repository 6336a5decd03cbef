//! Integration tests for texture loading and scene assembly.

use std::path::{Path, PathBuf};

use tracer_resources::{ALL_SCENES, ResourceError, SamplerConfig, Scene, Texture};

fn placeholder_texture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets/textures/white.png")
}

#[test]
fn test_load_placeholder_texture() {
    let texture = Texture::load_texture(placeholder_texture_path(), SamplerConfig::default())
        .expect("Failed to load placeholder texture");

    assert!(texture.width() > 0);
    assert!(texture.height() > 0);
    assert_eq!(
        texture.pixels().len(),
        (texture.width() * texture.height() * 4) as usize,
        "Texture should be tightly packed RGBA8"
    );
    assert!(
        texture.pixels().iter().all(|&texel| texel == 255),
        "Placeholder texture should be opaque white"
    );
}

#[test]
fn test_missing_texture_is_reported() {
    let result = Texture::load_texture("does/not/exist.png", SamplerConfig::default());
    assert!(matches!(result, Err(ResourceError::FileNotFound(_))));
}

#[test]
fn test_scene_requires_textures() {
    let assets = (ALL_SCENES[0].factory)().expect("Scene factory failed");
    let result = Scene::new(ALL_SCENES[0].name, assets.models, Vec::new());
    assert!(matches!(result, Err(ResourceError::NoTextures)));
}

#[test]
fn test_scene_requires_models() {
    let texture = Texture::load_texture(placeholder_texture_path(), SamplerConfig::default())
        .expect("Failed to load placeholder texture");
    let result = Scene::new("empty", Vec::new(), vec![texture]);
    assert!(matches!(result, Err(ResourceError::NoModels(_))));
}

#[test]
fn test_registry_scenes_assemble_with_placeholder() {
    let texture = Texture::load_texture(placeholder_texture_path(), SamplerConfig::default())
        .expect("Failed to load placeholder texture");

    for entry in ALL_SCENES {
        let assets = (entry.factory)().expect("Scene factory failed");
        let model_count = assets.models.len();

        let mut textures = assets.textures;
        if textures.is_empty() {
            textures.push(texture.clone());
        }

        let scene = Scene::new(entry.name, assets.models, textures).expect("Scene should assemble");
        assert_eq!(scene.models().len(), model_count);
        assert!(scene.vertex_count() > 0, "'{}' has no vertices", entry.name);
        assert_eq!(scene.index_count() % 3, 0);
        // Only the Cornell box is built from triangles alone
        assert_eq!(
            scene.has_procedurals(),
            entry.name != "Cornell Box",
            "'{}' procedural geometry",
            entry.name
        );

        println!(
            "{}: {} models, {} vertices, {} procedurals",
            entry.name,
            scene.models().len(),
            scene.vertex_count(),
            scene.procedural_count()
        );
    }
}
