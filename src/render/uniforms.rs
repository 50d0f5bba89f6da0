use glam::{Mat3, Mat4, Vec3};

use crate::scene::{FrameTransforms, SceneState};

/// Per-frame uniform block shared by every draw.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniforms {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub light_space: [[f32; 4]; 4],
    pub sun_dir_eye: [f32; 3],
    pub ambient_strength: f32,
    pub sun_color: [f32; 3],
    pub fog_start: f32,
    pub lamp_pos_eye: [f32; 3],
    pub fog_end: f32,
    pub lamp_color: [f32; 3],
    pub flat_shading: f32,
    pub beacon_pos_eye: [f32; 3],
    pub _pad0: f32,
    pub beacon_color: [f32; 3],
    pub _pad1: f32,
    pub fog_color: [f32; 3],
    pub _pad2: f32,
}

impl FrameUniforms {
    /// Pack the frame's transforms and lighting. Light directions and
    /// positions move into eye space here so the shader matches the
    /// eye-space normals produced by the normal matrices.
    pub fn pack(frame: &FrameTransforms, scene: &SceneState, projection: Mat4) -> Self {
        let view_linear = Mat3::from_mat4(frame.view);
        let sun = scene.sun();
        let lamp = scene.lamp();
        let beacon = scene.beacon();
        let fog = scene.fog();

        let sun_dir_eye = view_linear * sun.direction.normalize_or_zero();
        let lamp_pos_eye = frame.view.transform_point3(lamp.position);
        let beacon_pos_eye = frame.view.transform_point3(beacon.position);

        Self {
            view: frame.view.to_cols_array_2d(),
            projection: projection.to_cols_array_2d(),
            light_space: frame.light_space.to_cols_array_2d(),
            sun_dir_eye: sun_dir_eye.to_array(),
            ambient_strength: scene.ambient_strength(),
            sun_color: sun.color.to_array(),
            fog_start: fog.start,
            lamp_pos_eye: lamp_pos_eye.to_array(),
            fog_end: fog.end,
            lamp_color: lamp.color.to_array(),
            flat_shading: if scene.render_mode().config().flat_shading {
                1.0
            } else {
                0.0
            },
            beacon_pos_eye: beacon_pos_eye.to_array(),
            _pad0: 0.0,
            beacon_color: beacon.color.to_array(),
            _pad1: 0.0,
            fog_color: fog.color.to_array(),
            _pad2: 0.0,
        }
    }
}

/// Per-object uniform block, written at a dynamic offset per draw.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniforms {
    pub model: [[f32; 4]; 4],
    /// Column-major 3x3 normal matrix, columns padded to vec4 for WGSL
    /// uniform alignment.
    pub normal: [[f32; 4]; 3],
    pub color: [f32; 3],
    /// 1.0 renders unlit (the sun marker cube).
    pub emissive: f32,
}

impl ObjectUniforms {
    pub fn pack(model: Mat4, normal: Mat3, color: Vec3, emissive: bool) -> Self {
        let n = normal.to_cols_array_2d();
        Self {
            model: model.to_cols_array_2d(),
            normal: [
                [n[0][0], n[0][1], n[0][2], 0.0],
                [n[1][0], n[1][1], n[1][2], 0.0],
                [n[2][0], n[2][1], n[2][2], 0.0],
            ],
            color: color.to_array(),
            emissive: if emissive { 1.0 } else { 0.0 },
        }
    }
}
