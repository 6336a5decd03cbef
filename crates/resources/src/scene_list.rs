//! The static scene registry.
//!
//! Scenes are selected by index; [`ALL_SCENES`] is ordered and never changes
//! at runtime. Each factory builds models and textures on the CPU and reports
//! the camera the scene should start with.

use glam::{Mat4, Vec3, Vec4};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::ResourceResult;
use crate::material::Material;
use crate::model::Model;
use crate::texture::Texture;

/// Default camera pose and optical parameters of a scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraInitialState {
    pub model_view: Mat4,
    /// Vertical field of view in degrees
    pub field_of_view: f32,
    pub aperture: f32,
    pub focus_distance: f32,
    pub gamma_correction: bool,
    pub has_sky: bool,
}

impl Default for CameraInitialState {
    fn default() -> Self {
        Self {
            model_view: Mat4::IDENTITY,
            field_of_view: 90.0,
            aperture: 0.0,
            focus_distance: 10.0,
            gamma_correction: true,
            has_sky: true,
        }
    }
}

/// Everything a scene factory produces.
#[derive(Debug)]
pub struct SceneAssets {
    pub models: Vec<Model>,
    /// May be empty; the scene selector substitutes a placeholder.
    pub textures: Vec<Texture>,
    pub camera: CameraInitialState,
}

/// Builds a scene's assets.
pub type SceneFactory = fn() -> ResourceResult<SceneAssets>;

/// A named entry of the scene registry.
#[derive(Clone, Copy, Debug)]
pub struct SceneEntry {
    pub name: &'static str,
    pub factory: SceneFactory,
}

/// Every scene shipped with the ray tracer, in menu order.
pub static ALL_SCENES: &[SceneEntry] = &[
    SceneEntry {
        name: "Cube And Spheres",
        factory: cube_and_spheres,
    },
    SceneEntry {
        name: "Ray Tracing In One Weekend",
        factory: ray_tracing_in_one_weekend,
    },
    SceneEntry {
        name: "Cornell Box",
        factory: cornell_box,
    },
];

fn cube_and_spheres() -> ResourceResult<SceneAssets> {
    let camera = CameraInitialState {
        model_view: Mat4::look_at_rh(Vec3::new(0.0, 0.0, 2.5), Vec3::ZERO, Vec3::Y),
        field_of_view: 90.0,
        aperture: 0.05,
        focus_distance: 2.5,
        gamma_correction: false,
        has_sky: true,
    };

    let models = vec![
        Model::create_box(
            Vec3::splat(-0.4),
            Vec3::splat(0.4),
            Material::lambertian(Vec4::new(0.9, 0.3, 0.3, 1.0), -1),
        ),
        Model::create_sphere(
            Vec3::new(1.0, 0.0, 0.0),
            0.5,
            Material::metallic(Vec4::new(0.7, 0.5, 0.8, 1.0), 0.2, -1),
            true,
        ),
        Model::create_sphere(
            Vec3::new(-1.0, 0.0, 0.0),
            0.5,
            Material::dielectric(1.5, -1),
            true,
        ),
        Model::create_sphere(
            Vec3::new(0.0, 1.0, 0.0),
            0.5,
            Material::lambertian(Vec4::ONE, -1),
            true,
        ),
    ];

    Ok(SceneAssets {
        models,
        textures: Vec::new(),
        camera,
    })
}

fn ray_tracing_in_one_weekend() -> ResourceResult<SceneAssets> {
    let camera = CameraInitialState {
        model_view: Mat4::look_at_rh(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y),
        field_of_view: 20.0,
        aperture: 0.1,
        focus_distance: 10.0,
        gamma_correction: true,
        has_sky: true,
    };

    // Fixed seed: benchmark runs must render the same spheres every time.
    let mut rng = StdRng::seed_from_u64(42);
    let mut random = move || rng.random::<f32>();

    let mut models = vec![Model::create_sphere(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Material::lambertian(Vec4::new(0.5, 0.5, 0.5, 1.0), -1),
        true,
    )];

    for a in -11..11 {
        for b in -11..11 {
            let choose_material = random();
            let center = Vec3::new(
                a as f32 + 0.9 * random(),
                0.2,
                b as f32 + 0.9 * random(),
            );

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let material = if choose_material < 0.8 {
                Material::lambertian(
                    Vec4::new(
                        random() * random(),
                        random() * random(),
                        random() * random(),
                        1.0,
                    ),
                    -1,
                )
            } else if choose_material < 0.95 {
                Material::metallic(
                    Vec4::new(
                        0.5 * (1.0 + random()),
                        0.5 * (1.0 + random()),
                        0.5 * (1.0 + random()),
                        1.0,
                    ),
                    0.5 * random(),
                    -1,
                )
            } else {
                Material::dielectric(1.5, -1)
            };

            models.push(Model::create_sphere(center, 0.2, material, true));
        }
    }

    models.push(Model::create_sphere(
        Vec3::new(0.0, 1.0, 0.0),
        1.0,
        Material::dielectric(1.5, -1),
        true,
    ));
    models.push(Model::create_sphere(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Material::lambertian(Vec4::new(0.4, 0.2, 0.1, 1.0), -1),
        true,
    ));
    models.push(Model::create_sphere(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Material::metallic(Vec4::new(0.7, 0.6, 0.5, 1.0), 0.0, -1),
        true,
    ));

    Ok(SceneAssets {
        models,
        textures: Vec::new(),
        camera,
    })
}

fn cornell_box() -> ResourceResult<SceneAssets> {
    let camera = CameraInitialState {
        model_view: Mat4::look_at_rh(
            Vec3::new(278.0, 278.0, 800.0),
            Vec3::new(278.0, 278.0, 0.0),
            Vec3::Y,
        ),
        field_of_view: 40.0,
        aperture: 0.0,
        focus_distance: 10.0,
        gamma_correction: true,
        has_sky: false,
    };

    let white = Material::lambertian(Vec4::new(0.73, 0.73, 0.73, 1.0), -1);

    let mut tall_box = Model::create_box(
        Vec3::new(0.0, 0.0, -165.0),
        Vec3::new(165.0, 330.0, 0.0),
        white,
    );
    tall_box.transform(
        Mat4::from_translation(Vec3::new(265.0, 0.0, -295.0))
            * Mat4::from_rotation_y(15.0_f32.to_radians()),
    );

    let short_box = {
        let mut model =
            Model::create_box(Vec3::new(0.0, 0.0, -165.0), Vec3::new(165.0, 165.0, 0.0), white);
        model.transform(
            Mat4::from_translation(Vec3::new(130.0, 0.0, -65.0))
                * Mat4::from_rotation_y((-18.0_f32).to_radians()),
        );
        model
    };

    Ok(SceneAssets {
        models: vec![Model::create_cornell_box(555.0), tall_box, short_box],
        textures: Vec::new(),
        camera,
    })
}
