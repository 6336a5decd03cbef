//! Platform abstraction layer for the ray tracer.
//!
//! This crate provides platform-specific functionality:
//! - Window management via winit
//! - The [`WindowHost`] contract the frame driver consumes
//! - Translation of winit input events into discrete [`InputEvent`]s

mod input;
mod window;

pub use input::{Action, InputEvent, KeyCode, MouseButton, translate_window_event};
pub use window::{Window, WindowConfig, WindowHost};

// Re-export winit types that users might need
pub use winit::event::WindowEvent;
pub use winit::event_loop::EventLoop;
