use std::fs;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::light::ShadowProjection;
use crate::orbit::Orientation;
use crate::transform::Placement;

/// Scene configuration: everything the frame loop treats as external
/// data rather than state it owns. JSON on disk; every field has a
/// default matching the stock airfield scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub camera: CameraConfig,
    pub orbit: OrbitConfig,
    pub airport: Placement,
    pub lamp: Placement,
    pub sun: SunConfig,
    pub lamp_light_position: Vec3,
    pub shadow: ShadowProjection,
    pub presentation: PresentationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    pub target: Vec3,
    /// Per-frame movement distance for held movement keys.
    pub speed: f32,
    /// Degrees of rotation per pixel of mouse travel.
    pub sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 25.0, -15.0),
            target: Vec3::new(0.0, 20.0, 15.0),
            speed: 0.75,
            sensitivity: 0.025,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    pub center: Vec3,
    pub radius: f32,
    /// Degrees the orbit advances per frame tick.
    pub speed_deg: f32,
    /// Authored-mesh correction for the orbiting airplane.
    pub airplane: Orientation,
    /// Degrees the propeller spins per frame tick.
    pub propeller_step_deg: f32,
    /// Beacon light offset from the airplane, in world axes.
    pub beacon_offset: Vec3,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            center: Vec3::new(25.0, 50.0, 25.0),
            radius: 100.0,
            speed_deg: 0.5,
            airplane: Orientation {
                yaw_offset_deg: 90.0,
                pitch_deg: 45.0,
                scale: 2.0,
            },
            propeller_step_deg: 45.0,
            beacon_offset: Vec3::new(0.0, -25.0, -5.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SunConfig {
    pub direction: Vec3,
    pub color: Vec3,
    /// Per-keypress nudge applied to the direction.
    pub move_speed: f32,
}

impl Default for SunConfig {
    fn default() -> Self {
        Self {
            // Slight Z lean keeps the direction off the exact vertical,
            // which would degenerate the shadow look-at basis.
            direction: Vec3::new(0.0, 25.0, 0.001),
            color: Vec3::splat(0.3),
            move_speed: 0.75,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    pub center: Vec3,
    pub radius: f32,
    pub speed_deg: f32,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            center: Vec3::new(200.0, 30.0, 25.0),
            radius: 200.0,
            speed_deg: 0.25,
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            orbit: OrbitConfig::default(),
            airport: Placement {
                translation: Vec3::ZERO,
                yaw_deg: 0.0,
                scale: 0.5,
            },
            lamp: Placement {
                translation: Vec3::new(330.0, 20.0, 0.0),
                yaw_deg: 90.0,
                scale: 10.0,
            },
            sun: SunConfig::default(),
            lamp_light_position: Vec3::new(330.0, 60.0, 5.0),
            shadow: ShadowProjection::default(),
            presentation: PresentationConfig::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

impl SceneConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the geometry core would refuse every frame anyway.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.camera.position == self.camera.target {
            return Err(ConfigError::Invalid("camera position equals target"));
        }
        if self.sun.direction.length_squared() < 1e-8 {
            return Err(ConfigError::Invalid("sun direction is zero"));
        }
        if self
            .sun
            .direction
            .normalize()
            .cross(Vec3::Y)
            .length_squared()
            < 1e-8
        {
            return Err(ConfigError::Invalid("sun direction is exactly vertical"));
        }
        if self.orbit.radius <= 0.0 {
            return Err(ConfigError::Invalid("orbit radius must be positive"));
        }
        if self.shadow.near >= self.shadow.far {
            return Err(ConfigError::Invalid("shadow near plane is past far plane"));
        }
        Ok(())
    }
}
