use glam::{Mat4, Quat, Vec3};

use crate::error::GeometryError;

/// World up axis; yaw always rotates around this, never around camera up.
pub const WORLD_UP: Vec3 = Vec3::Y;

/// Squared-length threshold below which a vector counts as degenerate.
const DEGENERATE_EPS: f32 = 1e-8;

/// Translation directions relative to the camera basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Forward,
    Backward,
    Left,
    Right,
}

/// First-person camera: a position plus an orthonormal front/up/right
/// basis. The basis stays orthonormal after every operation.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    target: Vec3,
    front: Vec3,
    up: Vec3,
    right: Vec3,
}

impl Camera {
    /// Build a camera at `position` facing `target`.
    ///
    /// The supplied `up` only hints at the vertical; the stored up vector
    /// is re-derived so the basis is orthonormal even when the caller's
    /// up is not perpendicular to the viewing direction.
    pub fn new(position: Vec3, target: Vec3, up: Vec3) -> Result<Self, GeometryError> {
        let (front, right, up) = derive_basis(target - position, up)?;
        Ok(Self {
            position,
            target,
            front,
            up,
            right,
        })
    }

    /// Right-handed look-at matrix for the current state. Pure.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Translate along the front or right axis. `speed` is the per-frame
    /// distance; no normalization happens here.
    pub fn translate(&mut self, direction: MoveDirection, speed: f32) {
        match direction {
            MoveDirection::Forward => self.position += self.front * speed,
            MoveDirection::Backward => self.position -= self.front * speed,
            MoveDirection::Right => self.position += self.right * speed,
            MoveDirection::Left => self.position -= self.right * speed,
        }
    }

    /// Pitch around the current right axis, then yaw around world up.
    ///
    /// Both rotations use axes captured before either is applied, so the
    /// result is order-sensitive (pitch first). No cumulative pitch clamp
    /// happens here; the input layer bounds per-event deltas. If the
    /// requested rotation would drive the front vector parallel to world
    /// up the basis would collapse, so the rotation is rejected and the
    /// camera left unchanged.
    pub fn rotate(&mut self, pitch_deg: f32, yaw_deg: f32) -> Result<(), GeometryError> {
        let pitched = Quat::from_axis_angle(self.right, pitch_deg.to_radians()) * self.front;
        let front = (Quat::from_axis_angle(WORLD_UP, yaw_deg.to_radians()) * pitched).normalize();

        let right = front.cross(WORLD_UP);
        if right.length_squared() < DEGENERATE_EPS {
            return Err(GeometryError::ParallelAxes);
        }
        let right = right.normalize();

        self.front = front;
        self.right = right;
        self.up = right.cross(front).normalize();
        Ok(())
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// The construction-time target. Not updated by `translate`/`rotate`;
    /// only `set_target` moves it.
    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    /// Move the camera without changing its orientation. Used by scripted
    /// paths (presentation mode) together with `set_target`.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Re-aim the camera at a new target, re-deriving the whole basis
    /// from the current position.
    pub fn set_target(&mut self, target: Vec3) -> Result<(), GeometryError> {
        let (front, right, up) = derive_basis(target - self.position, WORLD_UP)?;
        self.target = target;
        self.front = front;
        self.right = right;
        self.up = up;
        Ok(())
    }
}

/// Derive an orthonormal (front, right, up) basis from a facing vector
/// and an approximate up.
fn derive_basis(facing: Vec3, up_hint: Vec3) -> Result<(Vec3, Vec3, Vec3), GeometryError> {
    if facing.length_squared() < DEGENERATE_EPS {
        return Err(GeometryError::ZeroDirection);
    }
    let front = facing.normalize();

    let right = front.cross(up_hint);
    if right.length_squared() < DEGENERATE_EPS {
        return Err(GeometryError::ParallelAxes);
    }
    let right = right.normalize();
    let up = right.cross(front).normalize();

    Ok((front, right, up))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_orthonormal(camera: &Camera) {
        let (f, u, r) = (camera.front(), camera.up(), camera.right());
        assert!((f.length() - 1.0).abs() < 1e-5);
        assert!((u.length() - 1.0).abs() < 1e-5);
        assert!((r.length() - 1.0).abs() < 1e-5);
        assert!(f.dot(u).abs() < 1e-5);
        assert!(f.dot(r).abs() < 1e-5);
        assert!(u.dot(r).abs() < 1e-5);
    }

    #[test]
    fn construction_orthonormalizes_skewed_up() {
        // Up hint deliberately not perpendicular to the facing direction.
        let camera = Camera::new(
            Vec3::new(0.0, 2.0, -10.0),
            Vec3::ZERO,
            Vec3::new(0.3, 1.0, 0.1),
        )
        .unwrap();
        assert_orthonormal(&camera);
    }

    #[test]
    fn construction_rejects_coincident_position_and_target() {
        let err = Camera::new(Vec3::ONE, Vec3::ONE, Vec3::Y).unwrap_err();
        assert_eq!(err, GeometryError::ZeroDirection);
    }

    #[test]
    fn construction_rejects_up_parallel_to_facing() {
        let err = Camera::new(Vec3::ZERO, Vec3::new(0.0, 5.0, 0.0), Vec3::Y).unwrap_err();
        assert_eq!(err, GeometryError::ParallelAxes);
    }

    #[test]
    fn view_matrix_matches_look_at() {
        let camera = Camera::new(Vec3::new(0.0, 0.0, -10.0), Vec3::ZERO, Vec3::Y).unwrap();
        // front is +Z here, so eye + front = (0, 0, -9).
        let expected = Mat4::look_at_rh(
            Vec3::new(0.0, 0.0, -10.0),
            Vec3::new(0.0, 0.0, -9.0),
            Vec3::Y,
        );
        assert!(camera.view_matrix().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn forward_then_backward_returns_home() {
        let start = Vec3::new(3.0, 25.0, -15.0);
        let mut camera = Camera::new(start, Vec3::new(0.0, 20.0, 15.0), Vec3::Y).unwrap();
        camera.translate(MoveDirection::Forward, 7.5);
        camera.translate(MoveDirection::Backward, 7.5);
        assert!(camera.position().abs_diff_eq(start, 1e-5));
    }

    #[test]
    fn left_then_right_returns_home() {
        let start = Vec3::new(3.0, 25.0, -15.0);
        let mut camera = Camera::new(start, Vec3::new(0.0, 20.0, 15.0), Vec3::Y).unwrap();
        camera.translate(MoveDirection::Left, 2.0);
        camera.translate(MoveDirection::Right, 2.0);
        assert!(camera.position().abs_diff_eq(start, 1e-5));
    }

    #[test]
    fn zero_rotation_is_a_noop() {
        let mut camera = Camera::new(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y).unwrap();
        let (f, u, r) = (camera.front(), camera.up(), camera.right());
        camera.rotate(0.0, 0.0).unwrap();
        assert!(camera.front().abs_diff_eq(f, 1e-6));
        assert!(camera.up().abs_diff_eq(u, 1e-6));
        assert!(camera.right().abs_diff_eq(r, 1e-6));
    }

    #[test]
    fn basis_stays_orthonormal_under_move_rotate_sequences() {
        let mut camera = Camera::new(Vec3::new(0.0, 25.0, -15.0), Vec3::ZERO, Vec3::Y).unwrap();
        let moves = [
            MoveDirection::Forward,
            MoveDirection::Left,
            MoveDirection::Backward,
            MoveDirection::Right,
        ];
        for i in 0..40 {
            camera.translate(moves[i % moves.len()], 0.75);
            camera.rotate(3.0, -5.0).unwrap();
            assert_orthonormal(&camera);
        }
    }

    #[test]
    fn pitch_before_yaw_is_order_sensitive() {
        // Pinned output for a known pitch/yaw pair: applying yaw first
        // would land somewhere else entirely.
        let mut camera = Camera::new(Vec3::ZERO, Vec3::Z, Vec3::Y).unwrap();
        camera.rotate(30.0, 45.0).unwrap();

        // Expected: pitch +30 deg about right = front x up = (-1,0,0),
        // then yaw +45 deg about world up, applied to front = (0,0,1).
        let pitched = Quat::from_axis_angle(Vec3::NEG_X, 30f32.to_radians()) * Vec3::Z;
        let expected = (Quat::from_axis_angle(Vec3::Y, 45f32.to_radians()) * pitched).normalize();
        assert!(camera.front().abs_diff_eq(expected, 1e-5));

        let yaw_first = Quat::from_axis_angle(Vec3::Y, 45f32.to_radians()) * Vec3::Z;
        let wrong = (Quat::from_axis_angle(Vec3::NEG_X, 30f32.to_radians()) * yaw_first).normalize();
        assert!(!camera.front().abs_diff_eq(wrong, 1e-3));
    }

    #[test]
    fn rotation_into_gimbal_lock_is_rejected() {
        // Facing +Z with right = (-1,0,0); pitching +90 deg about that
        // axis sends front to straight up, which would collapse the
        // basis. The rotation must be refused and the state preserved.
        let mut camera = Camera::new(Vec3::ZERO, Vec3::Z, Vec3::Y).unwrap();
        let before = camera.front();
        let err = camera.rotate(90.0, 0.0).unwrap_err();
        assert_eq!(err, GeometryError::ParallelAxes);
        assert!(camera.front().abs_diff_eq(before, 1e-6));
        assert_orthonormal(&camera);
    }

    #[test]
    fn target_is_not_tracked_by_movement() {
        let target = Vec3::new(0.0, 20.0, 15.0);
        let mut camera = Camera::new(Vec3::new(0.0, 25.0, -15.0), target, Vec3::Y).unwrap();
        camera.translate(MoveDirection::Forward, 10.0);
        camera.rotate(5.0, 5.0).unwrap();
        assert_eq!(camera.target(), target);
    }

    #[test]
    fn set_target_re_aims_the_basis() {
        let mut camera = Camera::new(Vec3::new(0.0, 10.0, -10.0), Vec3::ZERO, Vec3::Y).unwrap();
        camera.set_position(Vec3::new(50.0, 30.0, 0.0));
        camera.set_target(Vec3::new(0.0, 30.0, 0.0)).unwrap();
        assert!(camera.front().abs_diff_eq(Vec3::NEG_X, 1e-5));
        assert_orthonormal(&camera);
    }
}
