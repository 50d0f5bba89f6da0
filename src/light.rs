use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::camera::WORLD_UP;
use crate::error::GeometryError;

const DEGENERATE_EPS: f32 = 1e-8;

/// The scene's sun: a directional light whose direction can be nudged at
/// runtime to move the shadows.
#[derive(Debug, Clone, Copy)]
pub struct DirectionalLight {
    pub direction: Vec3,
    pub color: Vec3,
}

impl DirectionalLight {
    pub fn new(direction: Vec3, color: Vec3) -> Self {
        Self { direction, color }
    }

    /// Nudge the light direction along the world axes.
    pub fn translate(&mut self, delta: Vec3) {
        self.direction += delta;
    }
}

/// A positioned point light (street lamp, airplane beacon).
#[derive(Debug, Clone, Copy)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
}

/// Orthographic frustum constants for the shadow pass. Scene-tuned; they
/// live in config rather than code.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ShadowProjection {
    pub near: f32,
    pub far: f32,
    pub half_extent: f32,
    /// Distance from the origin at which the virtual light camera sits.
    pub distance: f32,
}

impl Default for ShadowProjection {
    fn default() -> Self {
        Self {
            near: 25.0,
            far: 100.0,
            half_extent: 25.0,
            distance: 25.0,
        }
    }
}

/// Projection-view matrix of the directional light's orthographic camera:
/// eye at `-normalize(direction) * distance`, looking at the origin with
/// world up. Purely a function of its inputs.
///
/// Errors when the direction is zero-length or (anti)parallel to world
/// up, where the look-at basis degenerates.
pub fn light_space_matrix(
    direction: Vec3,
    projection: &ShadowProjection,
) -> Result<Mat4, GeometryError> {
    if direction.length_squared() < DEGENERATE_EPS {
        return Err(GeometryError::ZeroDirection);
    }
    let dir = direction.normalize();
    if dir.cross(WORLD_UP).length_squared() < DEGENERATE_EPS {
        return Err(GeometryError::ParallelAxes);
    }

    let eye = -dir * projection.distance;
    let view = Mat4::look_at_rh(eye, Vec3::ZERO, WORLD_UP);
    let e = projection.half_extent;
    // 0..1 depth range, matching wgpu clip space.
    let ortho = Mat4::orthographic_rh(-e, e, -e, e, projection.near, projection.far);

    Ok(ortho * view)
}
