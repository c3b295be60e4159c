//! Elastic impedance (Connolly, 1999) and extended elastic impedance
//! (Whitcombe et al., 2002).
//!
//! Both are single-medium power-law transforms; no ray tracing is involved.
//! EEI replaces the incidence angle with a rotation angle χ and normalizes
//! by reference velocities and density so that values stay on the scale of
//! acoustic impedance.

use serde::{Deserialize, Serialize};

use crate::error::{ReflectivityError, Result};


/// Normalization constants of the extended elastic impedance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpedanceReference {
    pub vp0: f64,
    pub vs0: f64,
    pub rho0: f64,
}

impl Default for ImpedanceReference {
    fn default() -> Self {
        Self {
            vp0: 1.0,
            vs0: 1.0,
            rho0: 1.0,
        }
    }
}

fn check_positive(formula: &'static str, values: &[(&str, f64)]) -> Result<()> {
    for (name, value) in values {
        if !(value.is_finite() && *value > 0.0) {
            return Err(ReflectivityError::domain(
                formula,
                format!("{} must be positive, got {}", name, value),
            ));
        }
    }
    Ok(())
}

/// EI(θ) = Vp^(1 + tan²θ) · ρ^(1 − 4K·sin²θ) · Vs^(−8K·sin²θ), K = (Vs/Vp)².
pub fn elastic_impedance(vp: f64, vs: f64, rho: f64, theta: &[f64]) -> Result<Vec<f64>> {
    check_positive("elastic_impedance", &[("vp", vp), ("vs", vs), ("rho", rho)])?;
    let k = (vs / vp).powi(2);

    Ok(theta
        .iter()
        .map(|t| {
            let sin2 = t.sin().powi(2);
            vp.powf(1.0 + t.tan().powi(2))
                * rho.powf(1.0 - 4.0 * k * sin2)
                * vs.powf(-8.0 * k * sin2)
        })
        .collect())
}

/// EEI(χ) = Vp0·ρ0 · (Vp/Vp0)^(cos χ + sin χ) · (ρ/ρ0)^(cos χ − 4K·sin χ)
/// · (Vs/Vs0)^(−8K·sin χ).
pub fn extended_elastic_impedance(
    vp: f64,
    vs: f64,
    rho: f64,
    chi: &[f64],
    reference: &ImpedanceReference,
) -> Result<Vec<f64>> {
    check_positive(
        "extended_elastic_impedance",
        &[
            ("vp", vp),
            ("vs", vs),
            ("rho", rho),
            ("vp0", reference.vp0),
            ("vs0", reference.vs0),
            ("rho0", reference.rho0),
        ],
    )?;
    let k = (vs / vp).powi(2);
    let (vp_ratio, vs_ratio, rho_ratio) = (
        vp / reference.vp0,
        vs / reference.vs0,
        rho / reference.rho0,
    );

    Ok(chi
        .iter()
        .map(|x| {
            let (sin, cos) = x.sin_cos();
            reference.vp0
                * reference.rho0
                * vp_ratio.powf(cos + sin)
                * rho_ratio.powf(cos - 4.0 * k * sin)
                * vs_ratio.powf(-8.0 * k * sin)
        })
        .collect())
}
