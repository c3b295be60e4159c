//! Ruger weak-anisotropy PP reflectivity for VTI and HTI media.
//!
//! Both forms add a Thomsen-parameter correction to an isotropic
//! Aki-Richards style term written in impedance, shear modulus and
//! velocity contrasts. Ray bending is taken from the isotropic ray tracer;
//! the anisotropy only enters through the correction. Angles past the P
//! critical angle evaluate to NaN.

use crate::avo::mean_angle;
use crate::error::Result;
use crate::layer::{Contrast, Layer};
use crate::snell;


/// Isotropic part shared by both forms: (A, B_iso, C_iso) such that
/// R = A + B·sin²θ + C·sin²θ·tan²θ.
fn isotropic_terms(c: &Contrast) -> (f64, f64, f64) {
    let shear_ratio = (2.0 * c.vs / c.vp).powi(2);
    let velocity = c.dvp / c.vp;
    (
        0.5 * c.dimpedance / c.impedance,
        0.5 * (velocity - shear_ratio * relative(c.dshear_modulus, c.shear_modulus)),
        0.5 * velocity,
    )
}

/// d/mean, taken as 0 when there is no contrast, so fluid pairs stay finite.
fn relative(d: f64, mean: f64) -> f64 {
    if d == 0.0 {
        0.0
    } else {
        d / mean
    }
}

/// Ruger (1997) PP reflectivity for an interface between two VTI media.
///
/// `e*` and `d*` are the Thomsen ε and δ of the upper (1) and lower (2) layer.
///
/// The angle terms are evaluated at the mean of θ1 and the isotropic
/// transmitted P angle, not at θ1 alone, so angles past the P critical
/// angle give NaN.
#[allow(clippy::too_many_arguments)]
pub fn ruger_vti(
    vp1: f64,
    vs1: f64,
    rho1: f64,
    e1: f64,
    d1: f64,
    vp2: f64,
    vs2: f64,
    rho2: f64,
    e2: f64,
    d2: f64,
    theta1: &[f64],
) -> Result<Vec<f64>> {
    let upper = Layer::new("ruger_vti", vp1, vs1, rho1)?;
    let lower = Layer::new("ruger_vti", vp2, vs2, rho2)?;
    let (a, b, c) = isotropic_terms(&Contrast::new(&upper, &lower));
    let b = b + 0.5 * (d2 - d1);
    let c = c + 0.5 * (e2 - e1);

    Ok(snell::snell(vp1, vp2, vs1, vs2, theta1)
        .iter()
        .map(|geom| {
            let theta = mean_angle(geom);
            let sin2 = theta.sin().powi(2);
            a + b * sin2 + c * sin2 * theta.tan().powi(2)
        })
        .collect())
}

/// Ruger (1998) azimuthal PP reflectivity for an interface between two HTI
/// media.
///
/// `e*`, `dv*` and `y*` are ε, δᵥ and γ of each layer; `az` is the azimuth
/// of the incidence plane measured from the symmetry axis, in radians.
///
/// As in [`ruger_vti`], the angle is the mean of θ1 and the isotropic
/// transmitted P angle rather than θ1, and post-critical angles give NaN.
#[allow(clippy::too_many_arguments)]
pub fn ruger_hti(
    vp1: f64,
    vs1: f64,
    rho1: f64,
    e1: f64,
    dv1: f64,
    y1: f64,
    vp2: f64,
    vs2: f64,
    rho2: f64,
    e2: f64,
    dv2: f64,
    y2: f64,
    theta1: &[f64],
    az: f64,
) -> Result<Vec<f64>> {
    let upper = Layer::new("ruger_hti", vp1, vs1, rho1)?;
    let lower = Layer::new("ruger_hti", vp2, vs2, rho2)?;
    let contrast = Contrast::new(&upper, &lower);
    let (a, b, c) = isotropic_terms(&contrast);

    let shear_ratio = (2.0 * contrast.vs / contrast.vp).powi(2);
    let (sin2_az, cos2_az) = (az.sin().powi(2), az.cos().powi(2));
    let (de, ddv, dy) = (e2 - e1, dv2 - dv1, y2 - y1);
    let b = b + 0.5 * (ddv + 2.0 * shear_ratio * dy) * sin2_az;
    let c = c + 0.5 * (de * cos2_az * cos2_az + ddv * sin2_az * cos2_az);

    Ok(snell::snell(vp1, vp2, vs1, vs2, theta1)
        .iter()
        .map(|geom| {
            let theta = mean_angle(geom);
            let sin2 = theta.sin().powi(2);
            a + b * sin2 + c * sin2 * theta.tan().powi(2)
        })
        .collect())
}
