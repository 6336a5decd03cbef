//! Ray Tracer - Main Entry Point
//!
//! Interactive progressive path tracer. Runs the frame driver inside the
//! winit event loop and exits with an error if any frame fails, or once the
//! window closes or a benchmark run completes.

mod headless;
mod options;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

use tracer_platform::{Window, WindowHost, translate_window_event};
use tracer_renderer::{FrameDriver, SceneSelector};
use tracer_resources::ALL_SCENES;

use crate::headless::HeadlessPipeline;
use crate::options::Options;

struct App {
    options: Options,
    window: Option<Window>,
    driver: Option<FrameDriver<HeadlessPipeline>>,
    /// First fatal error; returned from `main` after the loop exits
    error: Option<anyhow::Error>,
}

impl App {
    fn new(options: Options) -> Self {
        Self {
            options,
            window: None,
            driver: None,
            error: None,
        }
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = Window::new(event_loop, self.options.window_config())
            .context("Failed to create window")?;

        let driver = FrameDriver::new(
            HeadlessPipeline::new(self.options.present_mode.into()),
            self.options.render_settings(),
            SceneSelector::new(ALL_SCENES, self.options.fallback_texture()),
            &window,
        )
        .context("Failed to create renderer")?;

        info!("Initialization complete, entering main loop");
        self.window = Some(window);
        self.driver = Some(driver);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        error!("{:#}", err);
        if self.error.is_none() {
            self.error = Some(err);
        }
        self.shutdown(event_loop);
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(mut driver) = self.driver.take() {
            info!("Rendered {} frames", driver.pipeline().frames());
            if let Err(e) = driver.shutdown() {
                error!("Shutdown error: {}", e);
            }
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.initialize(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let (Some(window), Some(driver)) = (self.window.as_mut(), self.driver.as_mut()) else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                window.close();
            }
            WindowEvent::Resized(size) => {
                info!("Window resized to {}x{}", size.width, size.height);
                driver.on_resize();
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = driver.draw_frame(window) {
                    self.fail(event_loop, e.into());
                }
            }
            event => {
                if let Some(input) = translate_window_event(&event) {
                    driver.handle_input(window, input);
                }
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = self.window.as_ref() else {
            return;
        };

        if window.is_closing() {
            self.shutdown(event_loop);
        } else {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    tracer_core::init_logging();

    let options = Options::parse();
    options.validate(ALL_SCENES.len())?;
    info!("Starting ray tracer");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(options);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
