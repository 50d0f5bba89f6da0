mod bindings;
mod controller;
mod winit_adapter;

pub use bindings::Bindings;
pub use controller::{Button, Controller};
pub use winit_adapter::WinitController;
