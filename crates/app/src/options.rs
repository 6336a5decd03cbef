//! Command line options.

use std::path::PathBuf;

use ash::vk;
use clap::{Parser, ValueEnum};
use tracer_core::{Error, Result};
use tracer_platform::WindowConfig;
use tracer_renderer::RenderSettings;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PresentMode {
    Immediate,
    Mailbox,
    Fifo,
    FifoRelaxed,
}

impl From<PresentMode> for vk::PresentModeKHR {
    fn from(mode: PresentMode) -> Self {
        match mode {
            PresentMode::Immediate => vk::PresentModeKHR::IMMEDIATE,
            PresentMode::Mailbox => vk::PresentModeKHR::MAILBOX,
            PresentMode::Fifo => vk::PresentModeKHR::FIFO,
            PresentMode::FifoRelaxed => vk::PresentModeKHR::FIFO_RELAXED,
        }
    }
}

/// Progressive path tracer.
#[derive(Clone, Debug, Parser)]
#[command(name = "ray_tracer", version, about)]
pub struct Options {
    /// Run the benchmark and exit when it completes
    #[arg(long)]
    pub benchmark: bool,

    /// Benchmark every scene after the starting one
    #[arg(long = "next-scenes")]
    pub benchmark_next_scenes: bool,

    /// Maximum time spent benchmarking one scene, in seconds
    #[arg(long = "max-time", default_value_t = 600)]
    pub benchmark_max_time: u32,

    /// Index of the scene to start with
    #[arg(long = "scene", default_value_t = 1)]
    pub scene_index: usize,

    /// Samples per pixel per frame
    #[arg(long = "samples", default_value_t = 8)]
    pub samples: u32,

    /// Maximum number of bounces per ray
    #[arg(long = "bounces", default_value_t = 16)]
    pub bounces: u32,

    /// Samples per pixel at which accumulation stops
    #[arg(long = "max-samples", default_value_t = 64 * 1024)]
    pub max_samples: u32,

    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    #[arg(long, default_value_t = 720)]
    pub height: u32,

    #[arg(long)]
    pub fullscreen: bool,

    #[arg(long = "present-mode", value_enum, default_value_t = PresentMode::Fifo)]
    pub present_mode: PresentMode,

    /// Directory holding the fallback texture
    #[arg(long, default_value = "assets")]
    pub assets: PathBuf,
}

impl Options {
    /// Reject values the renderer cannot start with.
    pub fn validate(&self, scene_count: usize) -> Result<()> {
        if self.scene_index >= scene_count {
            return Err(Error::Config(format!(
                "scene index is too high ({} >= {})",
                self.scene_index, scene_count
            )));
        }
        if self.samples == 0 {
            return Err(Error::Config("samples must be at least 1".to_string()));
        }
        if self.bounces == 0 {
            return Err(Error::Config("bounces must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            benchmark: self.benchmark,
            benchmark_next_scenes: self.benchmark_next_scenes,
            benchmark_max_time: self.benchmark_max_time,
            scene_index: self.scene_index,
            is_ray_traced: true,
            accumulate_rays: true,
            number_of_samples: self.samples,
            number_of_bounces: self.bounces,
            max_number_of_samples: self.max_samples,
            show_settings: !self.benchmark,
            show_overlay: true,
            ..RenderSettings::default()
        }
    }

    pub fn window_config(&self) -> WindowConfig {
        WindowConfig {
            title: "Ray Tracer".to_string(),
            width: self.width,
            height: self.height,
            fullscreen: self.fullscreen,
            resizable: !self.fullscreen,
        }
    }

    pub fn fallback_texture(&self) -> PathBuf {
        self.assets.join("textures").join("white.png")
    }
}
