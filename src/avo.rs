//! Weak-contrast isotropic approximations to the Zoeppritz PP reflectivity.
//!
//! Each formula traces the angle sequence once, forms the layer averages and
//! contrasts, and evaluates a closed-form expression per angle. Angles past
//! the P critical angle have no transmitted P angle and evaluate to NaN.

use crate::error::{ReflectivityError, Result};
use crate::layer::{Contrast, Layer};
use crate::snell::{self, RayGeometry};


/// Intercept, gradient and curvature of the three-term Shuey form
/// R(θ) = A + B·sin²θ + C·(tan²θ − sin²θ).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShueyTerms {
    pub intercept: f64,
    pub gradient: f64,
    pub curvature: f64,
}

impl ShueyTerms {
    pub fn evaluate(&self, theta: f64) -> f64 {
        let sin2 = theta.sin().powi(2);
        let tan2 = theta.tan().powi(2);
        self.intercept + self.gradient * sin2 + self.curvature * (tan2 - sin2)
    }
}

/// Shuey three-term coefficients for a pair of layers.
pub fn shuey_terms(
    vp1: f64,
    vs1: f64,
    rho1: f64,
    vp2: f64,
    vs2: f64,
    rho2: f64,
) -> Result<ShueyTerms> {
    let upper = Layer::new("shuey", vp1, vs1, rho1)?;
    let lower = Layer::new("shuey", vp2, vs2, rho2)?;
    Ok(terms_for(&Contrast::new(&upper, &lower)))
}

fn terms_for(c: &Contrast) -> ShueyTerms {
    let vp2 = c.vp * c.vp;
    ShueyTerms {
        intercept: 0.5 * (c.dvp / c.vp + c.drho / c.rho),
        // 2(vs/vp)²(Δρ/ρ + 2Δvs/vs), written without dividing by vs
        gradient: 0.5 * c.dvp / c.vp
            - 2.0 * c.vs * c.vs / vp2 * c.drho / c.rho
            - 4.0 * c.vs * c.dvs / vp2,
        curvature: 0.5 * c.dvp / c.vp,
    }
}

/// Shuey (1985) three-term PP reflectivity, evaluated at the mean of the
/// incidence and transmission angles.
pub fn shuey(
    vp1: f64,
    vs1: f64,
    rho1: f64,
    vp2: f64,
    vs2: f64,
    rho2: f64,
    theta1: &[f64],
) -> Result<Vec<f64>> {
    let upper = Layer::new("shuey", vp1, vs1, rho1)?;
    let lower = Layer::new("shuey", vp2, vs2, rho2)?;
    let terms = terms_for(&Contrast::new(&upper, &lower));

    Ok(snell::snell(vp1, vp2, vs1, vs2, theta1)
        .iter()
        .map(|geom| terms.evaluate(mean_angle(geom)))
        .collect())
}

/// Aki-Richards (1980) linearised PP reflectivity.
pub fn aki_richards(
    vp1: f64,
    vs1: f64,
    rho1: f64,
    vp2: f64,
    vs2: f64,
    rho2: f64,
    theta1: &[f64],
) -> Result<Vec<f64>> {
    let upper = Layer::new("aki_richards", vp1, vs1, rho1)?;
    let lower = Layer::new("aki_richards", vp2, vs2, rho2)?;
    let c = Contrast::new(&upper, &lower);

    Ok(snell::snell(vp1, vp2, vs1, vs2, theta1)
        .iter()
        .map(|geom| {
            let theta = mean_angle(geom);
            let pvs2 = 4.0 * geom.p * geom.p * c.vs * c.vs;
            0.5 * (1.0 - pvs2) * c.drho / c.rho + c.dvp / (2.0 * theta.cos().powi(2) * c.vp)
                - 4.0 * geom.p * geom.p * c.vs * c.dvs
        })
        .collect())
}

/// Bortfeld (1961) PP reflectivity, evaluated on the raw incidence and
/// transmission angles.
///
/// The shear term divides by ln(vs2/vs1), so both shear velocities must be
/// positive and differ unless the densities are equal too, in which case the
/// shear term vanishes identically.
pub fn bortfeld(
    vp1: f64,
    vs1: f64,
    rho1: f64,
    vp2: f64,
    vs2: f64,
    rho2: f64,
    theta1: &[f64],
) -> Result<Vec<f64>> {
    Layer::new("bortfeld", vp1, vs1, rho1)?;
    Layer::new("bortfeld", vp2, vs2, rho2)?;
    if vs1 <= 0.0 || vs2 <= 0.0 {
        return Err(ReflectivityError::domain(
            "bortfeld",
            "shear velocities must be positive",
        ));
    }

    let shear_factor = if vs1 != vs2 {
        2.0 + (rho2 / rho1).ln() / (vs2 / vs1).ln()
    } else if rho1 == rho2 {
        0.0
    } else {
        return Err(ReflectivityError::domain(
            "bortfeld",
            format!(
                "vs1 = vs2 = {} with a density contrast divides by ln(vs2/vs1) = 0",
                vs1
            ),
        ));
    };

    Ok(snell::snell(vp1, vp2, vs1, vs2, theta1)
        .iter()
        .map(|geom| {
            let theta2 = geom.theta2().unwrap_or(f64::NAN);
            0.5 * ((vp2 * rho2 * geom.theta1.cos()) / (vp1 * rho1 * theta2.cos())).ln()
                + geom.p * geom.p * (vs1 * vs1 - vs2 * vs2) * shear_factor
        })
        .collect())
}

/// Mean of incidence and transmitted P angles, NaN past the P critical angle.
pub(crate) fn mean_angle(geom: &RayGeometry) -> f64 {
    match geom.theta2() {
        Some(theta2) => 0.5 * (geom.theta1 + theta2),
        None => f64::NAN,
    }
}
