//! Texture loading.

use std::path::Path;

use tracing::info;

use crate::error::{ResourceError, ResourceResult};

/// Texel filtering mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Filter {
    Nearest,
    Linear,
}

/// Behaviour of texture coordinates outside `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressMode {
    Repeat,
    MirroredRepeat,
    ClampToEdge,
    ClampToBorder,
}

/// How a texture is sampled once uploaded.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SamplerConfig {
    pub mag_filter: Filter,
    pub min_filter: Filter,
    pub address_mode_u: AddressMode,
    pub address_mode_v: AddressMode,
    pub address_mode_w: AddressMode,
    pub anisotropy_enable: bool,
    pub max_anisotropy: f32,
    pub mip_lod_bias: f32,
    pub min_lod: f32,
    pub max_lod: f32,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            mag_filter: Filter::Linear,
            min_filter: Filter::Linear,
            address_mode_u: AddressMode::Repeat,
            address_mode_v: AddressMode::Repeat,
            address_mode_w: AddressMode::Repeat,
            anisotropy_enable: true,
            max_anisotropy: 16.0,
            mip_lod_bias: 0.0,
            min_lod: 0.0,
            max_lod: 0.0,
        }
    }
}

/// A decoded RGBA8 texture and its sampler configuration.
#[derive(Clone, Debug)]
pub struct Texture {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    sampler: SamplerConfig,
}

impl Texture {
    /// Load and decode an image file into an RGBA8 texture.
    ///
    /// # Errors
    /// Returns [`ResourceError::FileNotFound`] if the path does not exist and
    /// [`ResourceError::Image`] if the file cannot be decoded.
    pub fn load_texture(path: impl AsRef<Path>, sampler: SamplerConfig) -> ResourceResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ResourceError::FileNotFound(path.to_path_buf()));
        }

        let image = image::open(path)?.to_rgba8();
        let (width, height) = image.dimensions();

        info!("Loaded texture '{}' ({}x{})", path.display(), width, height);

        Ok(Self {
            width,
            height,
            pixels: image.into_raw(),
            sampler,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Tightly packed RGBA8 texels, row by row.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn sampler(&self) -> &SamplerConfig {
        &self.sampler
    }
}
