//! Real-time airfield scene viewer.
//!
//! The crate splits into a CPU side that derives every per-frame
//! transform (camera basis, orbit placement, normal matrices, the
//! directional light's light-space matrix) and a GPU side that renders
//! the result with a shadow pre-pass and a forward pass. All of the
//! frame math lives in plain modules with no GPU types, so it tests
//! without a device.

pub mod camera;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod input;
pub mod light;
pub mod modes;
pub mod orbit;
pub mod render;
pub mod scene;
pub mod transform;

pub use camera::{Camera, MoveDirection};
pub use config::SceneConfig;
pub use error::GeometryError;
pub use scene::{FrameTransforms, SceneState};
