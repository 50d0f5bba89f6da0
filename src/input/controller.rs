/// Logical input buttons the scene cares about. Anything the backend
/// reports outside this set is ignored, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    // Camera movement
    KeyW,
    KeyA,
    KeyS,
    KeyD,
    // Camera rotation
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    // Sun movement
    KeyI,
    KeyJ,
    KeyK,
    KeyL,
    KeyU,
    KeyO,
    // Orbit speed
    KeyZ,
    KeyX,
    // Toggles
    KeyN,
    KeyM,
    KeyQ,
    KeyC,
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Escape,
}

/// Input capability the scene core consumes: query held buttons, drain
/// the accumulated mouse delta. Backed by winit in the app and by a
/// synthetic implementation in tests.
pub trait Controller {
    /// True while the button is held down.
    fn is_down(&self, button: Button) -> bool;

    /// Mouse travel (in pixels) since the last call; draining resets the
    /// accumulator so a delta is applied at most once.
    fn take_mouse_delta(&mut self) -> (f32, f32);
}
