use thiserror::Error;

/// Degenerate geometric input detected before it can poison a transform
/// with NaN/Inf components.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    /// A direction vector had (near) zero length.
    #[error("direction vector has zero length")]
    ZeroDirection,

    /// Two axes that must span a plane were (near) parallel.
    #[error("axes are parallel, basis is undefined")]
    ParallelAxes,

    /// A matrix that must be inverted had (near) zero determinant.
    #[error("matrix is singular and cannot be inverted")]
    SingularMatrix,
}
