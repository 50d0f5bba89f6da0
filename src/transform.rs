use glam::{Mat3, Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

/// Determinant magnitude below which a matrix counts as singular.
const SINGULAR_EPS: f32 = 1e-12;

/// Normal matrix for lighting: inverse-transpose of the upper 3x3 of
/// `view * model`. Must be recomputed whenever either operand changes;
/// there is no caching here, so a freshly derived matrix is always
/// consistent with its inputs.
pub fn normal_matrix(view: &Mat4, model: &Mat4) -> Result<Mat3, GeometryError> {
    let linear = Mat3::from_mat4(*view * *model);
    if linear.determinant().abs() < SINGULAR_EPS {
        return Err(GeometryError::SingularMatrix);
    }
    Ok(linear.inverse().transpose())
}

/// A model matrix paired with the normal matrix derived from it and the
/// view it was derived against. Construct through [`TransformPair::derive`]
/// so the two can never drift apart.
#[derive(Debug, Clone, Copy)]
pub struct TransformPair {
    pub model: Mat4,
    pub normal: Mat3,
}

impl TransformPair {
    /// Derive the pair for `model` under `view`.
    pub fn derive(view: &Mat4, model: Mat4) -> Result<Self, GeometryError> {
        let normal = normal_matrix(view, &model)?;
        Ok(Self { model, normal })
    }

    /// Derive the pair for a sub-part parented to this transform: the
    /// child's model is `parent * local`, and its normal matrix comes
    /// from the combined matrix, not the parent's alone.
    pub fn child(&self, view: &Mat4, local: Mat4) -> Result<Self, GeometryError> {
        Self::derive(view, self.model * local)
    }
}

/// A static object placement: translation, yaw about world up, uniform
/// scale. Covers everything the fixed scenery needs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Placement {
    pub translation: Vec3,
    pub yaw_deg: f32,
    pub scale: f32,
}

impl Placement {
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.translation)
            * Mat4::from_rotation_y(self.yaw_deg.to_radians())
            * Mat4::from_scale(Vec3::splat(self.scale))
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            yaw_deg: 0.0,
            scale: 1.0,
        }
    }
}
