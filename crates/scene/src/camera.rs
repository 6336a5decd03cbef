//! Model-view camera controller.
//!
//! The controller keeps a camera orientation and position plus a model
//! rotation driven by the mouse. Keyboard state moves the camera in
//! [`ModelViewController::update_camera`]; every entry point reports whether
//! the rendered view changed.

use glam::{Mat3, Mat4, Vec3};
use tracing::debug;

use tracer_platform::{Action, KeyCode, MouseButton};

/// Mouse travel in pixels that maps to one radian of camera rotation.
const ROTATION_DIVISOR: f64 = 300.0;

/// Keys currently held for camera motion.
#[derive(Clone, Copy, Debug, Default)]
struct Movement {
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
    up: bool,
    down: bool,
}

impl Movement {
    fn any(&self) -> bool {
        self.forward || self.backward || self.left || self.right || self.up || self.down
    }
}

/// Converts input into a model-view matrix.
///
/// Left mouse drag rotates the camera, right mouse drag rotates the model,
/// W/S/A/D move along the view axes and Left-Shift/Left-Ctrl move up/down.
#[derive(Clone, Debug)]
pub struct ModelViewController {
    /// Camera orientation (rotation only)
    orientation: Mat4,
    /// Camera position in world space
    position: Vec3,
    right: Vec3,
    up: Vec3,
    forward: Vec3,
    movement: Movement,
    mouse_left_pressed: bool,
    mouse_right_pressed: bool,
    mouse_position: (f64, f64),
    /// Pending camera rotation, consumed by `update_camera`
    camera_rotation: (f64, f64),
    /// Accumulated model rotation
    model_rotation: (f64, f64),
}

impl Default for ModelViewController {
    fn default() -> Self {
        let mut controller = Self {
            orientation: Mat4::IDENTITY,
            position: Vec3::ZERO,
            right: Vec3::X,
            up: Vec3::Y,
            forward: Vec3::NEG_Z,
            movement: Movement::default(),
            mouse_left_pressed: false,
            mouse_right_pressed: false,
            mouse_position: (0.0, 0.0),
            camera_rotation: (0.0, 0.0),
            model_rotation: (0.0, 0.0),
        };
        controller.update_vectors();
        controller
    }
}

impl ModelViewController {
    /// Create a controller at the origin looking down -Z.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reinitialize the pose from a model-view matrix.
    ///
    /// Called once per scene load with the scene's initial camera.
    pub fn reset(&mut self, model_view: Mat4) {
        self.position = model_view.inverse().transform_point3(Vec3::ZERO);
        self.orientation = Mat4::from_mat3(Mat3::from_mat4(model_view));

        self.camera_rotation = (0.0, 0.0);
        self.model_rotation = (0.0, 0.0);
        self.mouse_left_pressed = false;
        self.mouse_right_pressed = false;

        self.update_vectors();
        debug!("Camera reset to {} facing {}", self.position, self.forward);
    }

    /// The current model-view matrix.
    pub fn model_view(&self) -> Mat4 {
        let model_rot_x = (self.model_rotation.1 / ROTATION_DIVISOR) as f32;
        let model_rot_y = (self.model_rotation.0 / ROTATION_DIVISOR) as f32;

        let model = Mat4::from_rotation_y(model_rot_y * 90.0_f32.to_radians())
            * Mat4::from_rotation_x(model_rot_x * 90.0_f32.to_radians());
        let view = self.orientation * Mat4::from_translation(-self.position);

        view * model
    }

    /// Get the camera position in world space.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Get the forward direction vector.
    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    /// Handle a key event. Returns `true` if the key is a camera motion key.
    pub fn on_key(&mut self, key: KeyCode, action: Action) -> bool {
        let held = action.is_held();
        let slot = match key {
            KeyCode::KeyW => &mut self.movement.forward,
            KeyCode::KeyS => &mut self.movement.backward,
            KeyCode::KeyA => &mut self.movement.left,
            KeyCode::KeyD => &mut self.movement.right,
            KeyCode::ShiftLeft => &mut self.movement.up,
            KeyCode::ControlLeft => &mut self.movement.down,
            _ => return false,
        };
        *slot = held;
        true
    }

    /// Handle cursor movement. Returns `true` while a drag rotates the view.
    pub fn on_cursor_position(&mut self, x: f64, y: f64) -> bool {
        let delta_x = x - self.mouse_position.0;
        let delta_y = y - self.mouse_position.1;

        if self.mouse_left_pressed {
            self.camera_rotation.0 += delta_x;
            self.camera_rotation.1 += delta_y;
        }

        if self.mouse_right_pressed {
            self.model_rotation.0 += delta_x;
            self.model_rotation.1 += delta_y;
        }

        self.mouse_position = (x, y);

        self.mouse_left_pressed || self.mouse_right_pressed
    }

    /// Handle a mouse button event.
    ///
    /// Pressing a button never changes the view by itself, so this always
    /// returns `false`.
    pub fn on_mouse_button(&mut self, button: MouseButton, action: Action) -> bool {
        match button {
            MouseButton::Left => self.mouse_left_pressed = action == Action::Press,
            MouseButton::Right => self.mouse_right_pressed = action == Action::Press,
            _ => {}
        }
        false
    }

    /// Advance the camera by `speed * time_delta` along every held motion key
    /// and apply pending mouse rotation.
    ///
    /// Returns `true` if the pose changed.
    pub fn update_camera(&mut self, speed: f64, time_delta: f64) -> bool {
        let d = (speed * time_delta) as f32;

        if self.movement.forward {
            self.move_forward(d);
        }
        if self.movement.backward {
            self.move_forward(-d);
        }
        if self.movement.left {
            self.move_right(-d);
        }
        if self.movement.right {
            self.move_right(d);
        }
        if self.movement.down {
            self.move_up(-d);
        }
        if self.movement.up {
            self.move_up(d);
        }

        let (rot_x, rot_y) = self.camera_rotation;
        self.rotate(
            (rot_x / ROTATION_DIVISOR) as f32,
            (rot_y / ROTATION_DIVISOR) as f32,
        );

        let updated = self.movement.any() || rot_x != 0.0 || rot_y != 0.0;
        self.camera_rotation = (0.0, 0.0);
        updated
    }

    fn move_forward(&mut self, d: f32) {
        self.position += d * self.forward;
    }

    fn move_right(&mut self, d: f32) {
        self.position += d * self.right;
    }

    fn move_up(&mut self, d: f32) {
        self.position += d * self.up;
    }

    fn rotate(&mut self, y: f32, x: f32) {
        if x == 0.0 && y == 0.0 {
            return;
        }
        self.orientation *= Mat4::from_axis_angle(self.right.normalize(), x);
        self.orientation *= Mat4::from_axis_angle(self.up.normalize(), y);
        self.update_vectors();
    }

    /// Recompute the view axes from the orientation matrix.
    fn update_vectors(&mut self) {
        let inverse = self.orientation.inverse();
        self.right = inverse.transform_vector3(Vec3::X);
        self.up = inverse.transform_vector3(Vec3::Y);
        self.forward = inverse.transform_vector3(Vec3::NEG_Z);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn approx_eq_vec3(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPSILON
    }

    fn looking_down_z() -> ModelViewController {
        let mut controller = ModelViewController::new();
        controller.reset(Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y));
        controller
    }

    #[test]
    fn test_reset_extracts_pose() {
        let controller = looking_down_z();
        assert!(
            approx_eq_vec3(controller.position(), Vec3::new(0.0, 0.0, 5.0)),
            "Expected (0, 0, 5), got {:?}",
            controller.position()
        );
        assert!(approx_eq_vec3(controller.forward(), Vec3::NEG_Z));
    }

    #[test]
    fn test_reset_round_trips_model_view() {
        let model_view = Mat4::look_at_rh(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y);
        let mut controller = ModelViewController::new();
        controller.reset(model_view);
        assert!(controller.model_view().abs_diff_eq(model_view, EPSILON));
    }

    #[test]
    fn test_idle_update_reports_no_change() {
        let mut controller = looking_down_z();
        assert!(!controller.update_camera(10.0, 0.016));
        assert!(approx_eq_vec3(controller.position(), Vec3::new(0.0, 0.0, 5.0)));
    }

    #[test]
    fn test_forward_key_moves_camera() {
        let mut controller = looking_down_z();
        assert!(controller.on_key(KeyCode::KeyW, Action::Press));
        assert!(controller.update_camera(10.0, 0.1));

        // 10 units/s for 0.1 s along -Z
        assert!(
            approx_eq_vec3(controller.position(), Vec3::new(0.0, 0.0, 4.0)),
            "Expected (0, 0, 4), got {:?}",
            controller.position()
        );

        assert!(controller.on_key(KeyCode::KeyW, Action::Release));
        assert!(!controller.update_camera(10.0, 0.1));
    }

    #[test]
    fn test_unrelated_key_is_not_consumed() {
        let mut controller = looking_down_z();
        assert!(!controller.on_key(KeyCode::KeyR, Action::Press));
        assert!(!controller.update_camera(10.0, 0.1));
    }

    #[test]
    fn test_cursor_without_button_does_not_rotate() {
        let mut controller = looking_down_z();
        assert!(!controller.on_cursor_position(100.0, 50.0));
        assert!(!controller.update_camera(10.0, 0.016));
    }

    #[test]
    fn test_left_drag_rotates_camera_once() {
        let mut controller = looking_down_z();
        controller.on_cursor_position(100.0, 100.0);
        assert!(!controller.on_mouse_button(MouseButton::Left, Action::Press));
        assert!(controller.on_cursor_position(130.0, 100.0));

        let before = controller.forward();
        assert!(controller.update_camera(10.0, 0.016));
        assert!(!approx_eq_vec3(before, controller.forward()));

        // The pending rotation is consumed by the update.
        assert!(!controller.update_camera(10.0, 0.016));
    }

    #[test]
    fn test_right_drag_rotates_model() {
        let mut controller = looking_down_z();
        let before = controller.model_view();
        controller.on_mouse_button(MouseButton::Right, Action::Press);
        assert!(controller.on_cursor_position(60.0, 0.0));
        assert!(!controller.model_view().abs_diff_eq(before, EPSILON));

        // The camera itself stays put
        let (position, forward) = (controller.position(), controller.forward());
        assert!(!controller.update_camera(1.0, 0.1));
        assert!(controller.position().abs_diff_eq(position, EPSILON));
        assert!(controller.forward().abs_diff_eq(forward, EPSILON));

        controller.on_mouse_button(MouseButton::Right, Action::Release);
        assert!(!controller.on_cursor_position(90.0, 0.0));
    }

    #[test]
    fn test_reset_clears_model_rotation() {
        let model_view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        let mut controller = ModelViewController::new();
        controller.reset(model_view);
        controller.on_mouse_button(MouseButton::Right, Action::Press);
        controller.on_cursor_position(200.0, 40.0);

        controller.reset(model_view);
        assert!(controller.model_view().abs_diff_eq(model_view, EPSILON));
    }
}
