use std::collections::HashSet;

use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::controller::{Button, Controller};

/// Bridges winit window events to the [`Controller`] capability.
///
/// Mouse deltas accumulate only while look mode is enabled (toggled by
/// the app together with cursor capture), mirroring the scene's
/// free-look toggle.
#[derive(Debug, Clone, Default)]
pub struct WinitController {
    pressed: HashSet<Button>,
    cursor: Option<(f32, f32)>,
    mouse_delta: (f32, f32),
    look_enabled: bool,
}

impl WinitController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(keycode) = event.physical_key {
                    if let Some(button) = keycode_to_button(keycode) {
                        match event.state {
                            ElementState::Pressed => {
                                let _ = self.pressed.insert(button);
                            }
                            ElementState::Released => {
                                let _ = self.pressed.remove(&button);
                            }
                        }
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let new = (position.x as f32, position.y as f32);
                if let Some(old) = self.cursor {
                    if self.look_enabled {
                        self.mouse_delta.0 += new.0 - old.0;
                        self.mouse_delta.1 += new.1 - old.1;
                    }
                }
                self.cursor = Some(new);
            }
            _ => {}
        }
    }

    pub fn look_enabled(&self) -> bool {
        self.look_enabled
    }

    pub fn set_look_enabled(&mut self, enabled: bool) {
        self.look_enabled = enabled;
        // Drop any delta accumulated across the toggle so the camera
        // does not jump when look mode re-engages.
        self.mouse_delta = (0.0, 0.0);
    }
}

impl Controller for WinitController {
    fn is_down(&self, button: Button) -> bool {
        self.pressed.contains(&button)
    }

    fn take_mouse_delta(&mut self) -> (f32, f32) {
        std::mem::take(&mut self.mouse_delta)
    }
}

fn keycode_to_button(keycode: KeyCode) -> Option<Button> {
    match keycode {
        KeyCode::KeyW => Some(Button::KeyW),
        KeyCode::KeyA => Some(Button::KeyA),
        KeyCode::KeyS => Some(Button::KeyS),
        KeyCode::KeyD => Some(Button::KeyD),
        KeyCode::ArrowUp => Some(Button::ArrowUp),
        KeyCode::ArrowDown => Some(Button::ArrowDown),
        KeyCode::ArrowLeft => Some(Button::ArrowLeft),
        KeyCode::ArrowRight => Some(Button::ArrowRight),
        KeyCode::KeyI => Some(Button::KeyI),
        KeyCode::KeyJ => Some(Button::KeyJ),
        KeyCode::KeyK => Some(Button::KeyK),
        KeyCode::KeyL => Some(Button::KeyL),
        KeyCode::KeyU => Some(Button::KeyU),
        KeyCode::KeyO => Some(Button::KeyO),
        KeyCode::KeyZ => Some(Button::KeyZ),
        KeyCode::KeyX => Some(Button::KeyX),
        KeyCode::KeyN => Some(Button::KeyN),
        KeyCode::KeyM => Some(Button::KeyM),
        KeyCode::KeyQ => Some(Button::KeyQ),
        KeyCode::KeyC => Some(Button::KeyC),
        KeyCode::Digit1 => Some(Button::Digit1),
        KeyCode::Digit2 => Some(Button::Digit2),
        KeyCode::Digit3 => Some(Button::Digit3),
        KeyCode::Digit4 => Some(Button::Digit4),
        KeyCode::Escape => Some(Button::Escape),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_controller_reports_nothing() {
        let mut controller = WinitController::new();
        assert!(!controller.is_down(Button::KeyW));
        assert_eq!(controller.take_mouse_delta(), (0.0, 0.0));
        assert!(!controller.look_enabled());
    }

    #[test]
    fn enabling_look_clears_stale_delta() {
        let mut controller = WinitController::new();
        controller.mouse_delta = (42.0, -17.0);
        controller.set_look_enabled(true);
        assert_eq!(controller.take_mouse_delta(), (0.0, 0.0));
    }

    #[test]
    fn take_mouse_delta_drains() {
        let mut controller = WinitController::new();
        controller.mouse_delta = (3.0, 4.0);
        assert_eq!(controller.take_mouse_delta(), (3.0, 4.0));
        assert_eq!(controller.take_mouse_delta(), (0.0, 0.0));
    }
}
