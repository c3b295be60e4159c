//! Normal-incidence acoustic reflection and transmission.
//!
//! At θ1 = 0 no mode conversion occurs and every exact or approximate PP
//! formula should reduce to the acoustic impedance contrast. These are the
//! reference values the other modules are checked against.

use crate::error::{ReflectivityError, Result};


/// Reflection (Z2 − Z1)/(Z2 + Z1) and transmission 2Z1/(Z1 + Z2) at normal
/// incidence, with Z = ρ·Vp.
pub fn normal_incidence(vp1: f64, rho1: f64, vp2: f64, rho2: f64) -> Result<(f64, f64)> {
    let z1 = vp1 * rho1;
    let z2 = vp2 * rho2;
    if !(vp1 > 0.0 && rho1 > 0.0 && vp2 > 0.0 && rho2 > 0.0) {
        return Err(ReflectivityError::domain(
            "normal_incidence",
            format!("impedances must be positive, got {} and {}", z1, z2),
        ));
    }
    Ok(((z2 - z1) / (z2 + z1), 2.0 * z1 / (z1 + z2)))
}
