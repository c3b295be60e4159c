//! Exact isotropic reflection and transmission coefficients (Zoeppritz).
//!
//! For each incidence angle the continuity of displacement and traction at
//! the interface gives a 4×4 linear system in the amplitudes of the reflected
//! P and S and transmitted P and S waves. The system is assembled from the
//! ray parameter rather than from angles, so past a critical angle the
//! cosine of the evanescent mode becomes imaginary (decaying branch) and the
//! coefficients come out complex instead of undefined.
//!
//! Rows of the system: horizontal displacement, vertical displacement, shear
//! traction, normal traction. Columns: reflected P, reflected S, transmitted
//! P, transmitted S.

use nalgebra::Matrix4;
use num_complex::Complex64;
use serde::Serialize;

use crate::error::{ReflectivityError, Result};
use crate::layer::Layer;
use crate::linalg;
use crate::settings::Settings;
use crate::snell::{self, RayGeometry};


/// Scattered amplitudes for a unit-amplitude incident P wave.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ElasticCoefficients {
    pub rpp: Complex64,
    pub rps: Complex64,
    pub tpp: Complex64,
    pub tps: Complex64,
}

/// Exact PP, PS reflection and PP, PS transmission coefficients per angle.
///
/// # Example
/// ```rust
/// use reflectivity::zoeppritz::zoeppritz;
///
/// let coeffs = zoeppritz(3000.0, 1500.0, 2200.0, 4000.0, 2000.0, 2500.0, &[0.0])?;
/// assert!((coeffs[0].rpp.re - 0.2048).abs() < 1e-4);
/// # Ok::<(), reflectivity::ReflectivityError>(())
/// ```
pub fn zoeppritz(
    vp1: f64,
    vs1: f64,
    rho1: f64,
    vp2: f64,
    vs2: f64,
    rho2: f64,
    theta1: &[f64],
) -> Result<Vec<ElasticCoefficients>> {
    zoeppritz_with_settings(&Settings::default(), vp1, vs1, rho1, vp2, vs2, rho2, theta1)
}

/// [`zoeppritz`] with explicit tolerances.
#[allow(clippy::too_many_arguments)]
pub fn zoeppritz_with_settings(
    settings: &Settings,
    vp1: f64,
    vs1: f64,
    rho1: f64,
    vp2: f64,
    vs2: f64,
    rho2: f64,
    theta1: &[f64],
) -> Result<Vec<ElasticCoefficients>> {
    let upper = Layer::new("zoeppritz", vp1, vs1, rho1)?;
    let lower = Layer::new("zoeppritz", vp2, vs2, rho2)?;
    log::debug!("zoeppritz: solving {} angles", theta1.len());

    snell::snell_with_settings(settings, vp1, vp2, vs1, vs2, theta1)
        .iter()
        .enumerate()
        .map(|(index, geom)| {
            let (m, n) = boundary_matrices(&upper, &lower, geom);
            let z = linalg::solve4(&m, &n.column(0).into_owned(), settings.singular_tolerance)
                .map_err(|singular| {
                    log::warn!(
                        "zoeppritz: singular system at angle index {} (theta1 = {})",
                        index,
                        geom.theta1
                    );
                    ReflectivityError::SingularMatrix {
                        formula: "zoeppritz",
                        index,
                        conditioning: singular.conditioning,
                        tolerance: settings.singular_tolerance,
                    }
                })?;
            Ok(ElasticCoefficients {
                rpp: z[0],
                rps: z[1],
                tpp: z[2],
                tps: z[3],
            })
        })
        .collect()
}

/// Cosine of an angle from its sine, on the decaying branch when |sin| > 1.
pub(crate) fn cos_from_sin(sine: f64) -> Complex64 {
    Complex64::new(1.0 - sine * sine, 0.0).sqrt()
}

/// Boundary-condition matrices M and N for one angle, with M·Z = N.
///
/// The first column of Z holds (Rpp, Rps, Tpp, Tps) for an incident P wave.
pub fn boundary_matrices(
    upper: &Layer,
    lower: &Layer,
    geom: &RayGeometry,
) -> (Matrix4<Complex64>, Matrix4<Complex64>) {
    let p = geom.p;
    let (sin_p1, sin_s1) = (p * upper.vp, p * upper.vs);
    let (sin_p2, sin_s2) = (p * lower.vp, p * lower.vs);

    let cos_p1 = Complex64::new(geom.theta1.cos(), 0.0);
    let cos_s1 = cos_from_sin(sin_s1);
    let cos_p2 = cos_from_sin(sin_p2);
    let cos_s2 = cos_from_sin(sin_s2);

    // cos 2φ = 1 − 2 sin²φ
    let cos2_s1 = 1.0 - 2.0 * sin_s1 * sin_s1;
    let cos2_s2 = 1.0 - 2.0 * sin_s2 * sin_s2;

    let r = |x: f64| Complex64::new(x, 0.0);
    let (rho1, rho2) = (upper.rho, lower.rho);

    let m = Matrix4::new(
        r(-sin_p1),
        -cos_s1,
        r(sin_p2),
        cos_s2,
        cos_p1,
        r(-sin_s1),
        cos_p2,
        r(-sin_s2),
        2.0 * rho1 * upper.vs * sin_s1 * cos_p1,
        r(rho1 * upper.vs * cos2_s1),
        2.0 * rho2 * lower.vs * sin_s2 * cos_p2,
        r(rho2 * lower.vs * cos2_s2),
        r(-rho1 * upper.vp * cos2_s1),
        2.0 * rho1 * upper.vs * sin_s1 * cos_s1,
        r(rho2 * lower.vp * cos2_s2),
        -2.0 * rho2 * lower.vs * sin_s2 * cos_s2,
    );

    // N differs from M by the sign of the horizontal-displacement and
    // normal-traction rows.
    let mut n = m;
    n.row_mut(0).neg_mut();
    n.row_mut(3).neg_mut();

    (m, n)
}
