//! Math utilities and types
//!
//! Provides the fundamental math types used by the scene graph.
//!
//! All matrices use nalgebra's column-vector convention: a point `p` is
//! transformed as `m * p`. Composing `local * increment` therefore applies
//! `increment` in the node's own frame, before `local` places it in the parent.

pub use nalgebra::{
    Vector3,
    Matrix3, Matrix4,
    Unit,
};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Axis lengths below this are treated as degenerate
    pub const AXIS_EPSILON: f32 = 1.0e-6;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }
}

/// Homogeneous rotation of `degrees` about `axis`.
///
/// The axis does not need to be unit length; only its direction matters.
/// A degenerate (near zero) axis yields the identity instead of NaNs.
pub fn rotation_degrees(axis: &Vec3, degrees: f32) -> Mat4 {
    match Unit::try_new(*axis, constants::AXIS_EPSILON) {
        Some(unit_axis) => Mat4::from_axis_angle(&unit_axis, utils::deg_to_rad(degrees)),
        None => Mat4::identity(),
    }
}

/// Homogeneous translation matrix
pub fn translation(offset: &Vec3) -> Mat4 {
    Mat4::new_translation(offset)
}

/// Translation column of an affine matrix
pub fn translation_of(matrix: &Mat4) -> Vec3 {
    Vec3::new(matrix.m14, matrix.m24, matrix.m34)
}

/// Check that `matrix` is affine: bottom row `(0, 0, 0, 1)` and finite entries
pub fn is_affine(matrix: &Mat4, epsilon: f32) -> bool {
    let bottom = matrix.row(3);
    matrix.iter().all(|v| v.is_finite())
        && approx::abs_diff_eq!(bottom[0], 0.0, epsilon = epsilon)
        && approx::abs_diff_eq!(bottom[1], 0.0, epsilon = epsilon)
        && approx::abs_diff_eq!(bottom[2], 0.0, epsilon = epsilon)
        && approx::abs_diff_eq!(bottom[3], 1.0, epsilon = epsilon)
}

/// Check that the upper-left 3x3 block of `matrix` is a pure rotation
pub fn has_orthonormal_rotation(matrix: &Mat4, epsilon: f32) -> bool {
    let block: Mat3 = matrix.fixed_view::<3, 3>(0, 0).into_owned();
    let product = block.transpose() * block;
    approx::relative_eq!(product, Mat3::identity(), epsilon = epsilon)
        && approx::abs_diff_eq!(block.determinant(), 1.0, epsilon = epsilon)
}
