use airfield::camera::{Camera, MoveDirection};
use glam::Vec3;

#[cfg(test)]
mod camera_tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn stock_camera() -> Camera {
        Camera::new(Vec3::new(0.0, 25.0, -15.0), Vec3::new(0.0, 20.0, 15.0), Vec3::Y).unwrap()
    }

    #[test]
    fn test_basis_stays_orthonormal_across_long_input_run() {
        let mut camera = stock_camera();

        for step in 0..500 {
            match step % 5 {
                0 => camera.translate(MoveDirection::Forward, 0.75),
                1 => camera.translate(MoveDirection::Left, 0.75),
                2 => camera.rotate(0.4, -0.9).unwrap(),
                3 => camera.rotate(-0.2, 1.3).unwrap(),
                _ => camera.translate(MoveDirection::Backward, 0.3),
            }
        }

        assert!((camera.front().length() - 1.0).abs() < EPS);
        assert!((camera.right().length() - 1.0).abs() < EPS);
        assert!((camera.up().length() - 1.0).abs() < EPS);
        assert!(camera.front().dot(camera.right()).abs() < EPS);
        assert!(camera.front().dot(camera.up()).abs() < EPS);
        assert!(camera.right().dot(camera.up()).abs() < EPS);
    }

    #[test]
    fn test_view_matrix_maps_eye_to_origin() {
        let camera = stock_camera();
        let view = camera.view_matrix();

        let eye = view.transform_point3(camera.position());
        assert!(eye.abs_diff_eq(Vec3::ZERO, 1e-4));

        // A point straight ahead lands on the negative Z axis.
        let ahead = view.transform_point3(camera.position() + camera.front() * 10.0);
        assert!(ahead.abs_diff_eq(Vec3::new(0.0, 0.0, -10.0), 1e-3));
    }

    #[test]
    fn test_strafe_is_perpendicular_to_view_direction() {
        let mut camera = stock_camera();
        let before = camera.position();
        let front = camera.front();

        camera.translate(MoveDirection::Right, 2.0);
        let moved = camera.position() - before;

        assert!((moved.length() - 2.0).abs() < EPS);
        assert!(moved.dot(front).abs() < EPS);
    }

    #[test]
    fn test_rotation_never_rolls_the_horizon() {
        let mut camera = stock_camera();
        for _ in 0..200 {
            camera.rotate(0.3, 0.7).unwrap();
        }
        // Right stays parallel to the ground plane: yaw about the world
        // up axis and pitch about right cannot introduce roll.
        assert!(camera.right().y.abs() < 1e-4);
    }

    #[test]
    fn test_rejected_rotation_preserves_the_view() {
        let mut camera = Camera::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0), Vec3::Y).unwrap();
        let view_before = camera.view_matrix();

        // Pitching a level camera a full quarter turn would collapse
        // front into the world up axis.
        assert!(camera.rotate(90.0, 0.0).is_err());
        assert_eq!(camera.view_matrix(), view_before);

        // The camera still works afterwards.
        camera.rotate(10.0, 5.0).unwrap();
        assert!((camera.front().length() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_degenerate_construction_is_refused() {
        assert!(Camera::new(Vec3::splat(3.0), Vec3::splat(3.0), Vec3::Y).is_err());
        // Looking straight down is parallel to the world up axis.
        assert!(Camera::new(Vec3::new(0.0, 10.0, 0.0), Vec3::ZERO, Vec3::Y).is_err());
    }
}
