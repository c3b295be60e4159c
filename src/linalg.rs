//! Small fixed-size complex linear solves for the boundary-condition systems.
//!
//! The exact solvers only ever need 2×2 inverses and 4×4 solves. Both check
//! the Hadamard conditioning ratio `|det(M)| / prod(|row_i|)`, which lies in
//! [0, 1] and does not depend on the scaling of individual rows, before
//! handing the system to nalgebra's LU decomposition.

use nalgebra::{Matrix2, Matrix4, Vector4};
use num_complex::Complex64;


/// A system rejected as numerically singular.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Singular {
    pub conditioning: f64,
}

/// Hadamard conditioning ratio of a 4×4 matrix.
pub fn conditioning4(m: &Matrix4<Complex64>) -> f64 {
    hadamard_ratio(m.determinant(), m.row_iter().map(|row| row.norm()))
}

/// Hadamard conditioning ratio of a 2×2 matrix.
pub fn conditioning2(m: &Matrix2<Complex64>) -> f64 {
    hadamard_ratio(m.determinant(), m.row_iter().map(|row| row.norm()))
}

fn hadamard_ratio(det: Complex64, row_norms: impl Iterator<Item = f64>) -> f64 {
    let scale: f64 = row_norms.product();
    if scale == 0.0 || !scale.is_finite() {
        return 0.0;
    }
    det.norm() / scale
}

/// Solve `m·x = b`, rejecting `m` when its conditioning falls below `tolerance`.
pub fn solve4(
    m: &Matrix4<Complex64>,
    b: &Vector4<Complex64>,
    tolerance: f64,
) -> Result<Vector4<Complex64>, Singular> {
    let conditioning = conditioning4(m);
    if !(conditioning >= tolerance) {
        return Err(Singular { conditioning });
    }
    m.lu().solve(b).ok_or(Singular { conditioning })
}

/// Invert `m`, rejecting it when its conditioning falls below `tolerance`.
pub fn inverse2(m: &Matrix2<Complex64>, tolerance: f64) -> Result<Matrix2<Complex64>, Singular> {
    let conditioning = conditioning2(m);
    if !(conditioning >= tolerance) {
        return Err(Singular { conditioning });
    }
    m.try_inverse().ok_or(Singular { conditioning })
}
