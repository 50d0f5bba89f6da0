use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Wrap an angle into [0, 360).
pub fn wrap_degrees(angle_deg: f32) -> f32 {
    angle_deg.rem_euclid(360.0)
}

/// A body on a planar circular orbit in the horizontal (XZ) plane.
///
/// The angle decreases as the orbit advances (matching the scene's
/// clockwise airplane loop when seen from above) and is kept normalized
/// to [0, 360) after every update.
#[derive(Debug, Clone)]
pub struct OrbitState {
    angle_deg: f32,
    center: Vec3,
    radius: f32,
    speed_deg: f32,
}

/// Smallest angular speed the runtime adjustment can reach.
pub const MIN_ORBIT_SPEED_DEG: f32 = 0.1;

impl OrbitState {
    pub fn new(center: Vec3, radius: f32, speed_deg: f32) -> Self {
        Self {
            angle_deg: 0.0,
            center,
            radius,
            speed_deg,
        }
    }

    /// Advance the orbit by `delta_deg` degrees. One call per rendered
    /// frame; callers targeting variable frame rates scale the delta by
    /// elapsed time before passing it in.
    pub fn advance(&mut self, delta_deg: f32) {
        self.angle_deg = wrap_degrees(self.angle_deg - delta_deg);
    }

    /// Current position on the orbit circle.
    pub fn position(&self) -> Vec3 {
        let (sin, cos) = self.angle_deg.to_radians().sin_cos();
        self.center + self.radius * Vec3::new(cos, 0.0, sin)
    }

    pub fn angle_deg(&self) -> f32 {
        self.angle_deg
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn speed_deg(&self) -> f32 {
        self.speed_deg
    }

    /// Nudge the angular speed at runtime, clamped to a floor so the
    /// orbit never stalls or reverses.
    pub fn adjust_speed(&mut self, delta_deg: f32) {
        self.speed_deg = (self.speed_deg + delta_deg).max(MIN_ORBIT_SPEED_DEG);
    }
}

/// Yaw (degrees) that makes a body at `position` face `center`, measured
/// in the XZ plane from the +X axis.
pub fn facing_yaw_deg(position: Vec3, center: Vec3) -> f32 {
    let to_center = center - position;
    to_center.z.atan2(to_center.x).to_degrees()
}

/// Authored-mesh correction: how an asset must be turned and tilted so
/// its nose lines up with the direction of travel. Scene data, not code.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Orientation {
    /// Added to the computed facing yaw (degrees).
    pub yaw_offset_deg: f32,
    /// Fixed tilt about the local X axis (degrees).
    pub pitch_deg: f32,
    /// Uniform scale.
    pub scale: f32,
}

impl Default for Orientation {
    fn default() -> Self {
        Self {
            yaw_offset_deg: 0.0,
            pitch_deg: 0.0,
            scale: 1.0,
        }
    }
}

/// Model matrix for an orbiting body: translate to the orbit position,
/// yaw to face the orbit center (plus the asset's authored offset), apply
/// the fixed tilt, then scale.
pub fn orbit_model_matrix(state: &OrbitState, orientation: &Orientation) -> Mat4 {
    let position = state.position();
    let yaw = facing_yaw_deg(position, state.center());

    Mat4::from_translation(position)
        * Mat4::from_rotation_y((-yaw + orientation.yaw_offset_deg).to_radians())
        * Mat4::from_rotation_x(orientation.pitch_deg.to_radians())
        * Mat4::from_scale(Vec3::splat(orientation.scale))
}
