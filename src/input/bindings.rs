use glam::Vec3;

use super::controller::{Button, Controller};
use crate::camera::MoveDirection;
use crate::config::CameraConfig;
use crate::core::Debounce;
use crate::modes::RenderMode;
use crate::scene::SceneState;

/// Per-event rotation bound (degrees). Bounds the rate of pitch/yaw
/// change, not the cumulative pitch; repeated frames can still walk the
/// camera toward the gimbal boundary, where `Camera::rotate` refuses to
/// collapse the basis.
const MAX_ROTATION_STEP_DEG: f32 = 89.0;

/// Seconds a discrete toggle stays blocked after firing.
const TOGGLE_WINDOW_SECS: f32 = 0.3;

/// Step applied to the orbit speed per (debounced) Z/X activation.
const ORBIT_SPEED_STEP_DEG: f32 = 0.1;

/// Translates held buttons and mouse travel into camera and scene
/// commands, once per frame, before the scene derives its transforms.
#[derive(Debug)]
pub struct Bindings {
    speed: f32,
    sensitivity: f32,
    toggle_gate: Debounce,
}

impl Bindings {
    pub fn new(camera: &CameraConfig) -> Self {
        Self {
            speed: camera.speed,
            sensitivity: camera.sensitivity,
            toggle_gate: Debounce::new(TOGGLE_WINDOW_SECS),
        }
    }

    /// Apply this frame's input to the scene. Runs strictly before
    /// `SceneState::advance` so the derived transforms see every
    /// mutation from the same frame.
    pub fn apply<C: Controller>(&mut self, controller: &mut C, scene: &mut SceneState, delta_secs: f32) {
        self.toggle_gate.tick(delta_secs);

        self.apply_movement(controller, scene);
        self.apply_rotation(controller, scene);
        self.apply_mouse_look(controller, scene);
        self.apply_sun(controller, scene);
        self.apply_toggles(controller, scene);
    }

    fn apply_movement<C: Controller>(&self, controller: &C, scene: &mut SceneState) {
        let held = [
            (Button::KeyW, MoveDirection::Forward),
            (Button::KeyS, MoveDirection::Backward),
            (Button::KeyA, MoveDirection::Left),
            (Button::KeyD, MoveDirection::Right),
        ];
        for (button, direction) in held {
            if controller.is_down(button) {
                scene.camera_mut().translate(direction, self.speed);
            }
        }
    }

    fn apply_rotation<C: Controller>(&self, controller: &C, scene: &mut SceneState) {
        let held = [
            (Button::ArrowUp, (self.speed, 0.0)),
            (Button::ArrowDown, (-self.speed, 0.0)),
            (Button::ArrowLeft, (0.0, self.speed)),
            (Button::ArrowRight, (0.0, -self.speed)),
        ];
        for (button, (pitch, yaw)) in held {
            if controller.is_down(button) {
                rotate_camera(scene, pitch, yaw);
            }
        }
    }

    fn apply_mouse_look<C: Controller>(&self, controller: &mut C, scene: &mut SceneState) {
        let (dx, dy) = controller.take_mouse_delta();
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        // Screen-up drag pitches up; both components clamp per event.
        let yaw = clamp_step(dx * self.sensitivity);
        let pitch = clamp_step(-dy * self.sensitivity);
        rotate_camera(scene, pitch, yaw);
    }

    fn apply_sun<C: Controller>(&self, controller: &C, scene: &mut SceneState) {
        let mut delta = Vec3::ZERO;
        if controller.is_down(Button::KeyI) {
            delta.z -= 1.0;
        }
        if controller.is_down(Button::KeyK) {
            delta.z += 1.0;
        }
        if controller.is_down(Button::KeyJ) {
            delta.x -= 1.0;
        }
        if controller.is_down(Button::KeyL) {
            delta.x += 1.0;
        }
        if controller.is_down(Button::KeyU) {
            delta.y += 1.0;
        }
        if controller.is_down(Button::KeyO) {
            delta.y -= 1.0;
        }
        if delta != Vec3::ZERO {
            scene.move_sun(delta);
        }
    }

    fn apply_toggles<C: Controller>(&mut self, controller: &C, scene: &mut SceneState) {
        let digit = [
            (Button::Digit1, 1u8),
            (Button::Digit2, 2),
            (Button::Digit3, 3),
            (Button::Digit4, 4),
        ]
        .into_iter()
        .find(|(button, _)| controller.is_down(*button));

        if let Some((_, digit)) = digit {
            if let Some(mode) = RenderMode::from_digit(digit) {
                if scene.render_mode() != mode && self.toggle_gate.try_fire() {
                    scene.set_render_mode(mode);
                }
            }
        }

        if controller.is_down(Button::KeyN) && self.toggle_gate.try_fire() {
            scene.toggle_time_of_day();
        }
        if controller.is_down(Button::KeyM) && self.toggle_gate.try_fire() {
            scene.toggle_depth_map();
        }
        if controller.is_down(Button::KeyQ) && self.toggle_gate.try_fire() {
            scene.toggle_presentation();
        }
        if controller.is_down(Button::KeyZ) && self.toggle_gate.try_fire() {
            scene.adjust_orbit_speed(ORBIT_SPEED_STEP_DEG);
        }
        if controller.is_down(Button::KeyX) && self.toggle_gate.try_fire() {
            scene.adjust_orbit_speed(-ORBIT_SPEED_STEP_DEG);
        }
    }
}

fn rotate_camera(scene: &mut SceneState, pitch_deg: f32, yaw_deg: f32) {
    if let Err(err) = scene.camera_mut().rotate(pitch_deg, yaw_deg) {
        log::warn!("rotation rejected: {err}");
    }
}

fn clamp_step(deg: f32) -> f32 {
    deg.clamp(-MAX_ROTATION_STEP_DEG, MAX_ROTATION_STEP_DEG)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;
    use crate::modes::TimeOfDay;

    /// Scripted controller: fixed held set plus a one-shot mouse delta.
    struct Script {
        held: Vec<Button>,
        mouse: (f32, f32),
    }

    impl Script {
        fn keys(held: &[Button]) -> Self {
            Self {
                held: held.to_vec(),
                mouse: (0.0, 0.0),
            }
        }

        fn mouse(delta: (f32, f32)) -> Self {
            Self {
                held: Vec::new(),
                mouse: delta,
            }
        }
    }

    impl Controller for Script {
        fn is_down(&self, button: Button) -> bool {
            self.held.contains(&button)
        }

        fn take_mouse_delta(&mut self) -> (f32, f32) {
            std::mem::take(&mut self.mouse)
        }
    }

    fn fixture() -> (Bindings, SceneState) {
        let config = SceneConfig::default();
        (
            Bindings::new(&config.camera),
            SceneState::from_config(&config).unwrap(),
        )
    }

    #[test]
    fn held_w_moves_along_front() {
        let (mut bindings, mut scene) = fixture();
        let before = scene.camera().position();
        let front = scene.camera().front();

        let mut controller = Script::keys(&[Button::KeyW]);
        bindings.apply(&mut controller, &mut scene, 0.016);

        let moved = scene.camera().position() - before;
        assert!(moved.abs_diff_eq(front * 0.75, 1e-5));
    }

    #[test]
    fn opposed_strafes_cancel() {
        let (mut bindings, mut scene) = fixture();
        let before = scene.camera().position();

        let mut controller = Script::keys(&[Button::KeyA, Button::KeyD]);
        bindings.apply(&mut controller, &mut scene, 0.016);
        assert!(scene.camera().position().abs_diff_eq(before, 1e-5));
    }

    #[test]
    fn mouse_delta_is_clamped_and_consumed() {
        let (mut bindings, mut scene) = fixture();
        let before = scene.camera().front();

        // Enormous delta: each component clamps to 89 deg, and the basis
        // survives orthonormal.
        let mut controller = Script::mouse((1.0e6, -1.0e6));
        bindings.apply(&mut controller, &mut scene, 0.016);

        assert!(!scene.camera().front().abs_diff_eq(before, 1e-4));
        assert!((scene.camera().front().length() - 1.0).abs() < 1e-4);
        assert_eq!(controller.mouse, (0.0, 0.0));
    }

    #[test]
    fn toggles_debounce_within_window() {
        let (mut bindings, mut scene) = fixture();
        assert_eq!(scene.time_of_day(), TimeOfDay::Night);

        let mut controller = Script::keys(&[Button::KeyN]);
        bindings.apply(&mut controller, &mut scene, 0.016);
        assert_eq!(scene.time_of_day(), TimeOfDay::Day);

        // Still held next frame: inside the window, no second toggle.
        bindings.apply(&mut controller, &mut scene, 0.016);
        assert_eq!(scene.time_of_day(), TimeOfDay::Day);

        // After the window drains it fires again.
        bindings.apply(&mut controller, &mut scene, 0.4);
        assert_eq!(scene.time_of_day(), TimeOfDay::Night);
    }

    #[test]
    fn orbit_speed_keys_step_with_floor() {
        let (mut bindings, mut scene) = fixture();
        let base = scene.orbit().speed_deg();

        let mut controller = Script::keys(&[Button::KeyZ]);
        bindings.apply(&mut controller, &mut scene, 0.016);
        assert!((scene.orbit().speed_deg() - (base + 0.1)).abs() < 1e-5);
    }

    #[test]
    fn sun_keys_move_the_light() {
        let (mut bindings, mut scene) = fixture();
        let before = scene.sun().direction;

        let mut controller = Script::keys(&[Button::KeyL, Button::KeyU]);
        bindings.apply(&mut controller, &mut scene, 0.016);

        let delta = scene.sun().direction - before;
        assert!(delta.abs_diff_eq(Vec3::new(0.75, 0.75, 0.0), 1e-5));
    }

    #[test]
    fn render_mode_digit_selects_once() {
        let (mut bindings, mut scene) = fixture();
        let mut controller = Script::keys(&[Button::Digit2]);
        bindings.apply(&mut controller, &mut scene, 0.016);
        assert_eq!(scene.render_mode(), RenderMode::Wireframe);

        // Re-selecting the current mode must not burn the toggle gate:
        // with the window drained, M still fires even while 2 is held.
        let mut controller = Script::keys(&[Button::Digit2, Button::KeyM]);
        bindings.apply(&mut controller, &mut scene, 0.4);
        assert!(scene.show_depth_map());
    }
}
