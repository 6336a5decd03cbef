//! Window management using winit.
//!
//! This module provides the [`WindowHost`] contract consumed by the frame
//! driver and its winit-backed implementation, [`Window`].

use std::sync::Arc;

use ash::vk;
use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Fullscreen, Window as WinitWindow, WindowAttributes};

use tracer_core::{Error, Result, Timer};

/// Static window configuration requested at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
    pub resizable: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Ray Tracer".to_string(),
            width: 1280,
            height: 720,
            fullscreen: false,
            resizable: true,
        }
    }
}

/// What the frame driver needs from the window it renders into.
pub trait WindowHost {
    /// Seconds elapsed since the window was created.
    fn time(&self) -> f64;

    /// Current framebuffer size in pixels.
    fn framebuffer_size(&self) -> vk::Extent2D;

    /// The configuration the window was created with.
    fn config(&self) -> &WindowConfig;

    /// Request the window to close. The current frame still completes.
    fn close(&mut self);

    /// Whether a close has been requested.
    fn is_closing(&self) -> bool;
}

/// A window wrapper around a winit window with its own clock.
pub struct Window {
    window: Arc<WinitWindow>,
    config: WindowConfig,
    timer: Timer,
    closing: bool,
}

impl Window {
    /// Create a new window from the given configuration.
    pub fn new(event_loop: &ActiveEventLoop, config: WindowConfig) -> Result<Self> {
        let mut attrs = WindowAttributes::default()
            .with_title(config.title.clone())
            .with_inner_size(PhysicalSize::new(config.width, config.height))
            .with_resizable(config.resizable);

        if config.fullscreen {
            attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let window = event_loop
            .create_window(attrs)
            .map_err(|e| Error::Window(e.to_string()))?;

        tracing::info!(
            "Window created: {}x{}{}",
            config.width,
            config.height,
            if config.fullscreen { " (fullscreen)" } else { "" }
        );

        Ok(Self {
            window: Arc::new(window),
            config,
            timer: Timer::new(),
            closing: false,
        })
    }

    /// Request a redraw of the window.
    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}

impl WindowHost for Window {
    fn time(&self) -> f64 {
        self.timer.elapsed_secs_f64()
    }

    fn framebuffer_size(&self) -> vk::Extent2D {
        let size = self.window.inner_size();
        vk::Extent2D {
            width: size.width,
            height: size.height,
        }
    }

    fn config(&self) -> &WindowConfig {
        &self.config
    }

    fn close(&mut self) {
        if !self.closing {
            tracing::debug!("Window close requested");
        }
        self.closing = true;
    }

    fn is_closing(&self) -> bool {
        self.closing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WindowConfig::default();
        assert_eq!((config.width, config.height), (1280, 720));
        assert!(!config.fullscreen);
        assert!(config.resizable);
    }
}
