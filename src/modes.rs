use glam::Vec3;
use serde::{Deserialize, Serialize};

/// How polygons are rasterized and shaded. Each variant maps to a fixed
/// configuration row rather than a chain of conditionals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderMode {
    Solid,
    Wireframe,
    Points,
    Smooth,
}

/// Rasterizer style a [`RenderMode`] selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolygonStyle {
    Fill,
    Line,
    Point,
}

/// Renderer-facing settings for one render mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderModeConfig {
    pub polygon: PolygonStyle,
    pub flat_shading: bool,
    pub point_size: f32,
}

impl RenderMode {
    /// Dispatch table: mode to renderer configuration.
    pub fn config(self) -> RenderModeConfig {
        match self {
            Self::Solid => RenderModeConfig {
                polygon: PolygonStyle::Fill,
                flat_shading: true,
                point_size: 1.0,
            },
            Self::Wireframe => RenderModeConfig {
                polygon: PolygonStyle::Line,
                flat_shading: false,
                point_size: 1.0,
            },
            Self::Points => RenderModeConfig {
                polygon: PolygonStyle::Point,
                flat_shading: false,
                point_size: 10.0,
            },
            Self::Smooth => RenderModeConfig {
                polygon: PolygonStyle::Fill,
                flat_shading: false,
                point_size: 1.0,
            },
        }
    }

    /// Number-row selection: keys 1..=4.
    pub fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            1 => Some(Self::Solid),
            2 => Some(Self::Wireframe),
            3 => Some(Self::Points),
            4 => Some(Self::Smooth),
            _ => None,
        }
    }
}

/// Day/night switch. Exactly one value is active at a time; everything
/// that changes with it lives in the [`Atmosphere`] table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeOfDay {
    Day,
    Night,
}

impl TimeOfDay {
    pub fn toggled(self) -> Self {
        match self {
            Self::Day => Self::Night,
            Self::Night => Self::Day,
        }
    }

    /// Atmosphere table for this time of day: fog band, ambient term and
    /// the point-light base colors.
    pub fn atmosphere(self) -> Atmosphere {
        match self {
            Self::Day => Atmosphere {
                fog: FogSettings {
                    color: Vec3::splat(1.0),
                    start: 1000.0,
                    end: 2000.0,
                },
                ambient_strength: 0.85,
                lamp_color: Vec3::ZERO,
                beacon_color: Vec3::ZERO,
            },
            Self::Night => Atmosphere {
                fog: FogSettings {
                    color: Vec3::new(0.1, 0.1, 0.2),
                    start: 0.0,
                    end: 1000.0,
                },
                ambient_strength: 0.15,
                lamp_color: Vec3::splat(1.0),
                beacon_color: Vec3::new(0.5, 1.0, 1.0),
            },
        }
    }
}

/// Linear distance fog band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FogSettings {
    pub color: Vec3,
    pub start: f32,
    pub end: f32,
}

/// Everything that swaps together when day/night toggles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Atmosphere {
    pub fog: FogSettings,
    pub ambient_strength: f32,
    pub lamp_color: Vec3,
    pub beacon_color: Vec3,
}
