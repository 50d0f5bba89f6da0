use glam::{Mat4, Vec3};

use crate::error::GeometryError;
use crate::scene::{FrameTransforms, SceneState};
use crate::transform::TransformPair;

/// Vertex format shared by every pipeline: position + face normal.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3],
    };
}

/// Unit cube centered at the origin, 24 vertices so each face keeps its
/// own normal.
pub fn cube_mesh() -> (Vec<Vertex>, Vec<u16>) {
    let faces: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Y, Vec3::NEG_Z),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::NEG_Z, Vec3::X),
        (Vec3::Z, Vec3::Y, Vec3::NEG_X),
        (Vec3::NEG_Z, Vec3::Y, Vec3::X),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, up, right) in faces {
        let base = vertices.len() as u16;
        for (u, v) in [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)] {
            let position = normal * 0.5 + right * u + up * v;
            vertices.push(Vertex {
                position: position.to_array(),
                normal: normal.to_array(),
            });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    (vertices, indices)
}

/// One draw of the shared cube: a fully derived transform pair plus
/// material scalars.
#[derive(Debug, Clone, Copy)]
pub struct DrawPart {
    pub pair: TransformPair,
    pub color: Vec3,
    pub emissive: bool,
}

/// Upper bound on parts per frame; sizes the per-object uniform buffer.
pub const MAX_PARTS: usize = 24;

fn local(translation: Vec3, scale: Vec3) -> Mat4 {
    Mat4::from_translation(translation) * Mat4::from_scale(scale)
}

/// Expand the frame's object transforms into proxy cube draws.
///
/// Each sub-part re-derives its own pair from the combined matrix, so
/// non-uniform local scales still light correctly. Proxy shapes stand in
/// for the original meshes (non-goal: asset loading); their local offsets
/// are expressed in each object's model space.
pub fn proxy_parts(
    frame: &FrameTransforms,
    scene: &SceneState,
) -> Result<Vec<DrawPart>, GeometryError> {
    let view = &frame.view;
    let mut parts = Vec::with_capacity(MAX_PARTS);

    // Airfield: apron slab, two runway strips, a low tower block.
    let ground = Vec3::new(0.35, 0.4, 0.3);
    let asphalt = Vec3::new(0.25, 0.25, 0.28);
    for (translation, scale, color) in [
        (Vec3::new(0.0, -2.0, 0.0), Vec3::new(900.0, 4.0, 900.0), ground),
        (Vec3::new(0.0, 0.1, 0.0), Vec3::new(700.0, 0.4, 60.0), asphalt),
        (Vec3::new(0.0, 0.1, 120.0), Vec3::new(60.0, 0.4, 500.0), asphalt),
        (Vec3::new(-180.0, 30.0, -150.0), Vec3::new(40.0, 60.0, 40.0), Vec3::new(0.6, 0.6, 0.65)),
    ] {
        parts.push(DrawPart {
            pair: frame.airport.child(view, local(translation, scale))?,
            color,
            emissive: false,
        });
    }

    // Airplane: fuselage, wings, tail fin. The body is authored nose
    // along +X, matching the orbit facing convention.
    let hull = Vec3::new(0.75, 0.78, 0.8);
    for (translation, scale, color) in [
        (Vec3::ZERO, Vec3::new(14.0, 3.0, 3.0), hull),
        (Vec3::new(-1.0, 0.5, 0.0), Vec3::new(4.0, 0.5, 22.0), hull),
        (Vec3::new(-6.0, 2.5, 0.0), Vec3::new(3.0, 4.0, 0.5), Vec3::new(0.8, 0.3, 0.3)),
    ] {
        parts.push(DrawPart {
            pair: frame.airplane.child(view, local(translation, scale))?,
            color,
            emissive: false,
        });
    }

    // Propeller: two crossed blades on the spinning sub-transform.
    for scale in [Vec3::new(0.4, 9.0, 0.8), Vec3::new(0.4, 0.8, 9.0)] {
        parts.push(DrawPart {
            pair: frame
                .propeller
                .child(view, local(Vec3::new(7.2, 0.0, 0.0), scale))?,
            color: Vec3::new(0.2, 0.2, 0.2),
            emissive: false,
        });
    }

    // Street lamp: pole plus glowing head.
    parts.push(DrawPart {
        pair: frame
            .lamp
            .child(view, local(Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.3, 4.0, 0.3)))?,
        color: Vec3::new(0.2, 0.22, 0.2),
        emissive: false,
    });
    let lamp_lit = scene.lamp().color.length_squared() > 0.0;
    parts.push(DrawPart {
        pair: frame
            .lamp
            .child(view, local(Vec3::new(0.0, 4.2, 0.5), Vec3::new(0.8, 0.4, 1.2)))?,
        color: if lamp_lit {
            scene.lamp().color
        } else {
            Vec3::new(0.4, 0.4, 0.4)
        },
        emissive: lamp_lit,
    });

    // Sun marker cube at the light direction, drawn unlit.
    let sun_model = Mat4::from_translation(scene.sun().direction) * Mat4::from_scale(Vec3::splat(2.0));
    parts.push(DrawPart {
        pair: TransformPair::derive(view, sun_model)?,
        color: Vec3::new(1.0, 0.95, 0.7),
        emissive: true,
    });

    debug_assert!(parts.len() <= MAX_PARTS);
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;

    #[test]
    fn cube_mesh_is_watertight_unit_cube() {
        let (vertices, indices) = cube_mesh();
        assert_eq!(vertices.len(), 24);
        assert_eq!(indices.len(), 36);
        for v in &vertices {
            let p = Vec3::from_array(v.position);
            // Every vertex sits on a corner of the half-unit cube.
            assert!((p.x.abs() - 0.5).abs() < 1e-6);
            assert!((p.y.abs() - 0.5).abs() < 1e-6);
            assert!((p.z.abs() - 0.5).abs() < 1e-6);
            // And its normal is axis-aligned unit length.
            let n = Vec3::from_array(v.normal);
            assert!((n.length() - 1.0).abs() < 1e-6);
            assert_eq!(n.abs().max_element(), 1.0);
        }
        for &i in &indices {
            assert!((i as usize) < vertices.len());
        }
    }

    #[test]
    fn proxy_parts_fit_the_uniform_buffer() {
        let mut scene = SceneState::from_config(&SceneConfig::default()).unwrap();
        let frame = scene.advance(0.0).unwrap();
        let parts = proxy_parts(&frame, &scene).unwrap();
        assert!(!parts.is_empty());
        assert!(parts.len() <= MAX_PARTS);
    }

    #[test]
    fn propeller_blades_ride_the_spin_transform() {
        let mut scene = SceneState::from_config(&SceneConfig::default()).unwrap();
        let frame = scene.advance(0.0).unwrap();
        let parts = proxy_parts(&frame, &scene).unwrap();

        // Blades are children of the propeller pair, so stripping the
        // propeller model off must leave a pure local transform.
        let blade = parts
            .iter()
            .find(|p| p.color.abs_diff_eq(Vec3::new(0.2, 0.2, 0.2), 1e-6))
            .unwrap();
        let local = frame.propeller.model.inverse() * blade.pair.model;
        let origin = local.transform_point3(Vec3::ZERO);
        assert!(origin.abs_diff_eq(Vec3::new(7.2, 0.0, 0.0), 1e-3));
    }

    #[test]
    fn lamp_head_glows_only_when_lit() {
        let mut scene = SceneState::from_config(&SceneConfig::default()).unwrap();
        // Night: lamp color is non-zero, head is emissive.
        let frame = scene.advance(0.5).unwrap();
        let parts = proxy_parts(&frame, &scene).unwrap();
        assert!(parts.iter().filter(|p| p.emissive).count() >= 2);

        scene.toggle_time_of_day();
        let frame = scene.advance(0.5).unwrap();
        let parts = proxy_parts(&frame, &scene).unwrap();
        // Day: only the sun marker stays emissive.
        assert_eq!(parts.iter().filter(|p| p.emissive).count(), 1);
    }
}
