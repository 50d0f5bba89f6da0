use glam::{Mat4, Vec3};
use rand::Rng;

use crate::camera::Camera;
use crate::config::{PresentationConfig, SceneConfig};
use crate::error::GeometryError;
use crate::light::{light_space_matrix, DirectionalLight, PointLight, ShadowProjection};
use crate::modes::{Atmosphere, FogSettings, RenderMode, TimeOfDay};
use crate::orbit::{orbit_model_matrix, wrap_degrees, Orientation, OrbitState};
use crate::transform::{Placement, TransformPair};

/// Everything the renderer consumes for one frame, derived in one place
/// so a matrix can never be a frame staler than the state it came from.
#[derive(Debug, Clone, Copy)]
pub struct FrameTransforms {
    pub view: Mat4,
    pub airport: TransformPair,
    pub airplane: TransformPair,
    pub propeller: TransformPair,
    pub lamp: TransformPair,
    pub light_space: Mat4,
}

/// The whole mutable scene, owned by the frame loop and passed by
/// reference to whoever needs it. Per frame: input mutates this state,
/// then [`SceneState::advance`] derives the transforms, then the
/// renderer consumes them. Nothing here is shared across threads.
#[derive(Debug)]
pub struct SceneState {
    camera: Camera,
    orbit: OrbitState,
    airplane_orientation: Orientation,
    propeller_spin_deg: f32,
    propeller_step_deg: f32,
    beacon_offset: Vec3,

    airport: Placement,
    lamp_placement: Placement,

    sun: DirectionalLight,
    sun_move_speed: f32,
    shadow: ShadowProjection,
    lamp: PointLight,
    beacon: PointLight,

    time_of_day: TimeOfDay,
    atmosphere: Atmosphere,
    render_mode: RenderMode,
    show_depth_map: bool,

    presentation: PresentationConfig,
    presentation_active: bool,
    presentation_angle_deg: f32,
}

impl SceneState {
    pub fn from_config(config: &SceneConfig) -> Result<Self, GeometryError> {
        let camera = Camera::new(
            config.camera.position,
            config.camera.target,
            Vec3::Y,
        )?;
        let time_of_day = TimeOfDay::Night;
        let atmosphere = time_of_day.atmosphere();

        Ok(Self {
            camera,
            orbit: OrbitState::new(
                config.orbit.center,
                config.orbit.radius,
                config.orbit.speed_deg,
            ),
            airplane_orientation: config.orbit.airplane,
            propeller_spin_deg: 0.0,
            propeller_step_deg: config.orbit.propeller_step_deg,
            beacon_offset: config.orbit.beacon_offset,
            airport: config.airport,
            lamp_placement: config.lamp,
            sun: DirectionalLight::new(config.sun.direction, config.sun.color),
            sun_move_speed: config.sun.move_speed,
            shadow: config.shadow,
            lamp: PointLight {
                position: config.lamp_light_position,
                color: atmosphere.lamp_color,
            },
            beacon: PointLight {
                position: Vec3::ZERO,
                color: atmosphere.beacon_color,
            },
            time_of_day,
            atmosphere,
            render_mode: RenderMode::Smooth,
            show_depth_map: false,
            presentation: config.presentation.clone(),
            presentation_active: false,
            presentation_angle_deg: 0.0,
        })
    }

    /// Advance one frame and derive every matrix the renderer needs.
    ///
    /// Must run strictly after this frame's input mutations and strictly
    /// before the transforms are consumed; returning the full set at once
    /// keeps a stale pair from surviving a mutation.
    pub fn advance(&mut self, elapsed_secs: f32) -> Result<FrameTransforms, GeometryError> {
        if self.presentation_active {
            self.step_presentation()?;
        }

        self.orbit.advance(self.orbit.speed_deg());
        self.propeller_spin_deg =
            wrap_degrees(self.propeller_spin_deg + self.propeller_step_deg);

        let jitter = rand::rng().random_range(0.0..0.2);
        self.lamp.color = self.atmosphere.lamp_color * flicker_factor(elapsed_secs, jitter);

        let view = self.camera.view_matrix();
        let airport = TransformPair::derive(&view, self.airport.model_matrix())?;
        let airplane = TransformPair::derive(
            &view,
            orbit_model_matrix(&self.orbit, &self.airplane_orientation),
        )?;
        let propeller = airplane.child(
            &view,
            Mat4::from_rotation_x(self.propeller_spin_deg.to_radians()),
        )?;
        let lamp = TransformPair::derive(&view, self.lamp_placement.model_matrix())?;

        self.beacon.position = self.orbit.position() + self.beacon_offset;
        self.beacon.color = self.atmosphere.beacon_color;

        let light_space = light_space_matrix(self.sun.direction, &self.shadow)?;

        Ok(FrameTransforms {
            view,
            airport,
            airplane,
            propeller,
            lamp,
            light_space,
        })
    }

    /// Camera circles the presentation center, always aimed at it.
    fn step_presentation(&mut self) -> Result<(), GeometryError> {
        self.presentation_angle_deg =
            wrap_degrees(self.presentation_angle_deg + self.presentation.speed_deg * 0.1);

        let (sin, cos) = self.presentation_angle_deg.to_radians().sin_cos();
        let position = Vec3::new(
            self.presentation.center.x + self.presentation.radius * cos,
            self.presentation.center.y,
            self.presentation.center.z + self.presentation.radius * sin,
        );
        self.camera.set_position(position);
        self.camera.set_target(self.presentation.center)
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn move_sun(&mut self, delta: Vec3) {
        self.sun.translate(delta * self.sun_move_speed);
    }

    pub fn adjust_orbit_speed(&mut self, delta_deg: f32) {
        self.orbit.adjust_speed(delta_deg);
    }

    pub fn toggle_time_of_day(&mut self) {
        self.time_of_day = self.time_of_day.toggled();
        self.atmosphere = self.time_of_day.atmosphere();
        log::info!("{:?} mode activated", self.time_of_day);
    }

    pub fn toggle_depth_map(&mut self) {
        self.show_depth_map = !self.show_depth_map;
    }

    pub fn toggle_presentation(&mut self) {
        self.presentation_active = !self.presentation_active;
        log::info!(
            "presentation mode {}",
            if self.presentation_active { "on" } else { "off" }
        );
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        if self.render_mode != mode {
            self.render_mode = mode;
            log::info!("switched to {:?} mode", mode);
        }
    }

    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    pub fn time_of_day(&self) -> TimeOfDay {
        self.time_of_day
    }

    pub fn show_depth_map(&self) -> bool {
        self.show_depth_map
    }

    pub fn presentation_active(&self) -> bool {
        self.presentation_active
    }

    pub fn fog(&self) -> FogSettings {
        self.atmosphere.fog
    }

    pub fn ambient_strength(&self) -> f32 {
        self.atmosphere.ambient_strength
    }

    pub fn sun(&self) -> DirectionalLight {
        self.sun
    }

    pub fn lamp(&self) -> PointLight {
        self.lamp
    }

    pub fn beacon(&self) -> PointLight {
        self.beacon
    }

    pub fn orbit(&self) -> &OrbitState {
        &self.orbit
    }
}

/// Lamp flicker: slow sine swell plus per-frame jitter. With jitter in
/// [0, 0.2) the factor stays inside [0.6, 1.2].
pub fn flicker_factor(elapsed_secs: f32, jitter: f32) -> f32 {
    0.8 + 0.2 * (elapsed_secs * 10.0).sin() + jitter
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::MoveDirection;

    fn scene() -> SceneState {
        SceneState::from_config(&SceneConfig::default()).unwrap()
    }

    #[test]
    fn advance_derives_consistent_pairs() {
        let mut scene = scene();
        let frame = scene.advance(0.016).unwrap();

        let expected =
            crate::transform::normal_matrix(&frame.view, &frame.airplane.model).unwrap();
        assert!(frame.airplane.normal.abs_diff_eq(expected, 1e-5));

        // Propeller is parented: its model embeds the airplane's.
        let local = frame.airplane.model.inverse() * frame.propeller.model;
        let spun = local.transform_vector3(Vec3::Y);
        assert!((spun.length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn advance_reflects_camera_mutation() {
        let mut scene = scene();
        let before = scene.advance(0.0).unwrap();
        scene.camera_mut().translate(MoveDirection::Forward, 10.0);
        scene.camera_mut().rotate(4.0, 9.0).unwrap();
        let after = scene.advance(0.0).unwrap();
        assert!(!before.view.abs_diff_eq(after.view, 1e-6));
        // Turning the camera must also refresh the static scenery's
        // normal matrix, which depends on the view's rotation.
        assert!(!before.airport.normal.abs_diff_eq(after.airport.normal, 1e-6));
    }

    #[test]
    fn orbit_advances_once_per_frame() {
        let mut scene = scene();
        let a0 = scene.orbit().angle_deg();
        scene.advance(0.0).unwrap();
        let a1 = scene.orbit().angle_deg();
        assert!((wrap_degrees(a0 - a1) - 0.5).abs() < 1e-4);
    }

    #[test]
    fn beacon_tracks_the_airplane() {
        let mut scene = scene();
        scene.advance(0.0).unwrap();
        let offset = scene.beacon().position - scene.orbit().position();
        assert!(offset.abs_diff_eq(Vec3::new(0.0, -25.0, -5.0), 1e-4));
    }

    #[test]
    fn day_night_toggle_swaps_the_atmosphere_table() {
        let mut scene = scene();
        assert_eq!(scene.time_of_day(), TimeOfDay::Night);
        let night_fog = scene.fog();

        scene.toggle_time_of_day();
        assert_eq!(scene.time_of_day(), TimeOfDay::Day);
        assert!(scene.fog().start > night_fog.start);
        assert!(scene.ambient_strength() > 0.5);

        // Daytime lamp is off even through the flicker path.
        scene.advance(1.0).unwrap();
        assert_eq!(scene.lamp().color, Vec3::ZERO);
        assert_eq!(scene.beacon().color, Vec3::ZERO);
    }

    #[test]
    fn lamp_flicker_stays_bounded_at_night() {
        let mut scene = scene();
        for i in 0..200 {
            scene.advance(i as f32 * 0.016).unwrap();
            let c = scene.lamp().color;
            assert!(c.x >= 0.6 - 1e-4 && c.x <= 1.2 + 1e-4);
            assert_eq!(c.x, c.y);
            assert_eq!(c.y, c.z);
        }
    }

    #[test]
    fn flicker_factor_bounds() {
        for i in 0..500 {
            let f = flicker_factor(i as f32 * 0.037, 0.199);
            assert!(f >= 0.6 && f <= 1.2);
        }
        assert!(flicker_factor(0.0, 0.0) >= 0.6);
    }

    #[test]
    fn presentation_mode_circles_and_aims_at_center() {
        let mut scene = scene();
        scene.toggle_presentation();
        scene.advance(0.0).unwrap();

        let center = SceneConfig::default().presentation.center;
        let radius = SceneConfig::default().presentation.radius;

        let position = scene.camera().position();
        assert!((position.y - center.y).abs() < 1e-3);
        assert!(((position - center).length() - radius).abs() < 1e-2);
        assert!(scene.camera().target().abs_diff_eq(center, 1e-4));

        // The camera actually faces the center.
        let to_center = (center - position).normalize();
        assert!(scene.camera().front().abs_diff_eq(to_center, 1e-4));
    }

    #[test]
    fn moving_sun_vertical_fails_fast_instead_of_nan() {
        let mut scene = scene();
        // Cancel the configured Z lean so the direction is exactly up.
        scene.move_sun(Vec3::new(0.0, 0.0, -0.001 / 0.75));
        let err = scene.advance(0.0).unwrap_err();
        assert_eq!(err, GeometryError::ParallelAxes);
    }

    #[test]
    fn propeller_spin_wraps() {
        let mut scene = scene();
        for _ in 0..16 {
            scene.advance(0.0).unwrap();
        }
        // 16 frames at 45 deg/frame is two full turns.
        let frame = scene.advance(0.0).unwrap();
        let local = frame.airplane.model.inverse() * frame.propeller.model;
        let expected = Mat4::from_rotation_x(45f32.to_radians());
        assert!(local.abs_diff_eq(expected, 1e-3));
    }
}
