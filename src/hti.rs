//! Exact PP reflectivity between two HTI media (Schoenberg & Protazio, 1992).
//!
//! The incidence plane contains the horizontal symmetry axis x1. In that
//! plane each medium is described by C11, C13, C33 and C55 of its rotated
//! stiffness tensor (see [`StiffnessTensor::to_horizontal_axis`]).
//!
//! For a horizontal slowness s1 fixed by the incident qP wave:
//! - the vertical slownesses of the qP and qS waves are the roots of a
//!   quadratic in s3² ([`vertical_slownesses`])
//! - the polarizations and tractions of the two upgoing waves form the 2×2
//!   impedance matrices X (displacement and normal traction on x1, x3) and Y
//!   ([`impedance_matrices`])
//! - the reflection matrix of the interface is
//!   R = (Y2⁻¹Y1 + X2⁻¹X1)⁻¹ (Y2⁻¹Y1 − X2⁻¹X1) ([`reflection_matrix`]),
//!   with Rpp = R\[0\]\[0\] and Rps = R\[1\]\[0\]

use nalgebra::Matrix2;
use num_complex::Complex64;

use crate::error::{ReflectivityError, Result};
use crate::layer::Layer;
use crate::linalg::{self, Singular};
use crate::settings::Settings;
use crate::thomsen::{self, StiffnessTensor};


/// Horizontal slowness of the qP wave travelling at phase angle `theta`
/// from the vertical, for a tensor already in the incidence-plane frame.
pub fn horizontal_slowness(c: &StiffnessTensor, rho: f64, theta: f64) -> f64 {
    let (sin, cos) = theta.sin_cos();
    let (sin2, cos2) = (sin * sin, cos * cos);
    let g11 = c.c11() * sin2 + c.c55() * cos2;
    let g33 = c.c55() * sin2 + c.c33() * cos2;
    let g13 = (c.c13() + c.c55()) * sin * cos;
    let v2 = 0.5 * (g11 + g33 + ((g11 - g33).powi(2) + 4.0 * g13 * g13).sqrt()) / rho;
    sin / v2.sqrt()
}

/// Vertical slownesses (qP, qS) for horizontal slowness `s1`.
///
/// The squared slownesses solve A·z² + B·z + C = 0 with
/// - A = C33·C55
/// - B = (C11·C33 + C55² − (C13 + C55)²)·s1² − ρ·(C33 + C55)
/// - C = (C11·s1² − ρ)(C55·s1² − ρ)
///
/// The root with the smaller real part belongs to qP.
pub fn vertical_slownesses(c: &StiffnessTensor, rho: f64, s1: f64) -> (Complex64, Complex64) {
    let (c11, c13, c33, c55) = (c.c11(), c.c13(), c.c33(), c.c55());
    let s1_2 = s1 * s1;
    let a = c33 * c55;
    let b = (c11 * c33 + c55 * c55 - (c13 + c55).powi(2)) * s1_2 - rho * (c33 + c55);
    let cc = (c11 * s1_2 - rho) * (c55 * s1_2 - rho);

    let disc = Complex64::new(b * b - 4.0 * a * cc, 0.0).sqrt();
    let mut roots = [(-b - disc) / (2.0 * a), (-b + disc) / (2.0 * a)];
    if roots[0].re > roots[1].re {
        roots.swap(0, 1);
    }
    (roots[0].sqrt(), roots[1].sqrt())
}

/// Unit polarizations and impedance matrices (X, Y) of one medium.
pub fn impedance_matrices(
    c: &StiffnessTensor,
    rho: f64,
    s1: f64,
) -> (Matrix2<Complex64>, Matrix2<Complex64>) {
    let (c11, c13, c33, c55) = (c.c11(), c.c13(), c.c33(), c.c55());
    let (s3p, s3s) = vertical_slownesses(c, rho, s1);
    let s1_2 = s1 * s1;

    let normalize = |e1: Complex64, e3: Complex64| {
        let norm = (e1 * e1 + e3 * e3).sqrt();
        (e1 / norm, e3 / norm)
    };
    let (p1, p3) = normalize((c13 + c55) * s1 * s3p, rho - c11 * s1_2 - c55 * s3p * s3p);
    let (q1, q3) = normalize(c33 * s3s * s3s + c55 * s1_2 - rho, -(c13 + c55) * s1 * s3s);

    let normal = |e1: Complex64, e3: Complex64, s3: Complex64| -(c13 * s1 * e1 + c33 * s3 * e3);
    let shear = |e1: Complex64, e3: Complex64, s3: Complex64| -c55 * (s1 * e3 + s3 * e1);

    let x = Matrix2::new(p1, q1, normal(p1, p3, s3p), normal(q1, q3, s3s));
    let y = Matrix2::new(shear(p1, p3, s3p), shear(q1, q3, s3s), p3, q3);
    (x, y)
}

/// Reflection matrix between media with impedance pairs `upper` and `lower`.
pub fn reflection_matrix(
    upper: &(Matrix2<Complex64>, Matrix2<Complex64>),
    lower: &(Matrix2<Complex64>, Matrix2<Complex64>),
    tolerance: f64,
) -> std::result::Result<Matrix2<Complex64>, Singular> {
    let (x1, y1) = upper;
    let (x2, y2) = lower;
    let a = linalg::inverse2(y2, tolerance)? * y1;
    let b = linalg::inverse2(x2, tolerance)? * x1;
    Ok(linalg::inverse2(&(a + b), tolerance)? * (a - b))
}

/// Full reflection matrices for tensors already in the incidence-plane
/// frame, one per phase angle of the incident qP wave.
pub fn exact_hti_tensors(
    settings: &Settings,
    upper: &StiffnessTensor,
    rho1: f64,
    lower: &StiffnessTensor,
    rho2: f64,
    theta1: &[f64],
) -> Result<Vec<Matrix2<Complex64>>> {
    log::debug!("exact_hti: solving {} angles", theta1.len());
    theta1
        .iter()
        .enumerate()
        .map(|(index, &theta)| {
            let s1 = horizontal_slowness(upper, rho1, theta);
            let top = impedance_matrices(upper, rho1, s1);
            let bottom = impedance_matrices(lower, rho2, s1);
            reflection_matrix(&top, &bottom, settings.singular_tolerance).map_err(|singular| {
                log::warn!(
                    "exact_hti: singular system at angle index {} (theta1 = {})",
                    index,
                    theta
                );
                ReflectivityError::SingularMatrix {
                    formula: "exact_hti",
                    index,
                    conditioning: singular.conditioning,
                    tolerance: settings.singular_tolerance,
                }
            })
        })
        .collect()
}

/// Exact Rpp between two HTI media.
///
/// `vp*` and `vs*` are velocities along the symmetry axis and `e*`, `d*`,
/// `y*` the Thomsen ε, δ and γ of each layer.
#[allow(clippy::too_many_arguments)]
pub fn exact_hti(
    vp1: f64,
    vs1: f64,
    rho1: f64,
    e1: f64,
    d1: f64,
    y1: f64,
    vp2: f64,
    vs2: f64,
    rho2: f64,
    e2: f64,
    d2: f64,
    y2: f64,
    theta1: &[f64],
) -> Result<Vec<Complex64>> {
    exact_hti_with_settings(
        &Settings::default(),
        vp1,
        vs1,
        rho1,
        e1,
        d1,
        y1,
        vp2,
        vs2,
        rho2,
        e2,
        d2,
        y2,
        theta1,
    )
}

/// [`exact_hti`] with explicit tolerances.
#[allow(clippy::too_many_arguments)]
pub fn exact_hti_with_settings(
    settings: &Settings,
    vp1: f64,
    vs1: f64,
    rho1: f64,
    e1: f64,
    d1: f64,
    y1: f64,
    vp2: f64,
    vs2: f64,
    rho2: f64,
    e2: f64,
    d2: f64,
    y2: f64,
    theta1: &[f64],
) -> Result<Vec<Complex64>> {
    Layer::new("exact_hti", vp1, vs1, rho1)?;
    Layer::new("exact_hti", vp2, vs2, rho2)?;
    if !(vs1 > 0.0 && vs2 > 0.0) {
        return Err(ReflectivityError::domain(
            "exact_hti",
            "both media need a positive S velocity",
        ));
    }
    let upper = thomsen::cij(e1, d1, y1, rho1, vp1, vs1)?.to_horizontal_axis();
    let lower = thomsen::cij(e2, d2, y2, rho2, vp2, vs2)?.to_horizontal_axis();

    Ok(exact_hti_tensors(settings, &upper, rho1, &lower, rho2, theta1)?
        .iter()
        .map(|r| r[(0, 0)])
        .collect())
}
