//! Input event translation for keyboard and mouse.
//!
//! The frame driver consumes discrete events rather than polled state, so
//! winit window events are reduced to [`InputEvent`] values here.

use winit::event::{ElementState, WindowEvent};
use winit::keyboard::PhysicalKey;

pub use winit::keyboard::KeyCode;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other,
}

impl From<winit::event::MouseButton> for MouseButton {
    fn from(button: winit::event::MouseButton) -> Self {
        match button {
            winit::event::MouseButton::Left => MouseButton::Left,
            winit::event::MouseButton::Right => MouseButton::Right,
            winit::event::MouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Other,
        }
    }
}

/// State transition carried by a key or button event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Press,
    Release,
    /// Key held down long enough for the OS to auto-repeat it.
    Repeat,
}

impl Action {
    /// Build an action from a winit element state and its repeat flag.
    pub fn from_state(state: ElementState, repeat: bool) -> Self {
        match state {
            ElementState::Released => Action::Release,
            ElementState::Pressed if repeat => Action::Repeat,
            ElementState::Pressed => Action::Press,
        }
    }

    /// Whether the key or button is held after this event.
    pub fn is_held(self) -> bool {
        self != Action::Release
    }
}

/// A discrete input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Key { key: KeyCode, action: Action },
    CursorMoved { x: f64, y: f64 },
    MouseButton { button: MouseButton, action: Action },
}

/// Reduce a winit window event to an [`InputEvent`].
///
/// Returns `None` for events that carry no input (resize, redraw, ...) and
/// for keys without a physical key code.
pub fn translate_window_event(event: &WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::KeyboardInput { event, .. } => match event.physical_key {
            PhysicalKey::Code(key) => Some(InputEvent::Key {
                key,
                action: Action::from_state(event.state, event.repeat),
            }),
            PhysicalKey::Unidentified(_) => None,
        },
        WindowEvent::CursorMoved { position, .. } => Some(InputEvent::CursorMoved {
            x: position.x,
            y: position.y,
        }),
        WindowEvent::MouseInput { state, button, .. } => Some(InputEvent::MouseButton {
            button: (*button).into(),
            action: Action::from_state(*state, false),
        }),
        _ => None,
    }
}
