//! Energy-flux partition of an exact Zoeppritz solution.
//!
//! The incident P wave's vertical energy flux is shared between the four
//! scattered waves. For a mode j with amplitude A_j the normalized share is
//!
//! |A_j|² · Re(ρ_j V_j cos θ_j) / (ρ1 Vp1 cos θ1)
//!
//! An evanescent mode has a purely imaginary cosine and carries no flux, so
//! the four shares sum to one at every angle, before and after the critical
//! angles. The shortfall [`EnergyPartition::missing`] is a direct check on
//! the accuracy of a solve.

use num_complex::Complex64;
use std::fmt;

use crate::error::Result;
use crate::layer::Layer;
use crate::settings::Settings;
use crate::snell::{self, RayGeometry};
use crate::zoeppritz::{self, cos_from_sin, ElasticCoefficients};


/// Fraction of the incident P energy flux carried by each scattered mode.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EnergyPartition {
    pub reflected_p: f64,
    pub reflected_s: f64,
    pub transmitted_p: f64,
    pub transmitted_s: f64,
}

impl EnergyPartition {
    /// Flux shares of the solution `coeffs` for the ray `geom`.
    pub fn new(
        upper: &Layer,
        lower: &Layer,
        geom: &RayGeometry,
        coeffs: &ElasticCoefficients,
    ) -> Self {
        let p = geom.p;
        let incident = upper.rho * upper.vp * geom.theta1.cos();
        let share = |amplitude: Complex64, rho: f64, v: f64| {
            let cosine = cos_from_sin(p * v);
            amplitude.norm_sqr() * (rho * v * cosine).re / incident
        };
        Self {
            reflected_p: coeffs.rpp.norm_sqr(),
            reflected_s: share(coeffs.rps, upper.rho, upper.vs),
            transmitted_p: share(coeffs.tpp, lower.rho, lower.vp),
            transmitted_s: share(coeffs.tps, lower.rho, lower.vs),
        }
    }

    pub fn total(&self) -> f64 {
        self.reflected_p + self.reflected_s + self.transmitted_p + self.transmitted_s
    }

    /// Incident flux not accounted for by the scattered modes.
    pub fn missing(&self) -> f64 {
        1.0 - self.total()
    }
}

impl fmt::Display for EnergyPartition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Energy:")?;
        writeln!(f, "  Reflected P:      {:.6}", self.reflected_p)?;
        writeln!(f, "  Reflected S:      {:.6}", self.reflected_s)?;
        writeln!(f, "  Transmitted P:    {:.6}", self.transmitted_p)?;
        writeln!(f, "  Transmitted S:    {:.6}", self.transmitted_s)?;
        writeln!(f, "  Missing:          {:.6}", self.missing())
    }
}

/// Exact Zoeppritz solution followed by its energy partition, per angle.
pub fn energy_partition(
    vp1: f64,
    vs1: f64,
    rho1: f64,
    vp2: f64,
    vs2: f64,
    rho2: f64,
    theta1: &[f64],
) -> Result<Vec<EnergyPartition>> {
    let upper = Layer::new("energy_partition", vp1, vs1, rho1)?;
    let lower = Layer::new("energy_partition", vp2, vs2, rho2)?;
    let settings = Settings::default();

    let coeffs =
        zoeppritz::zoeppritz_with_settings(&settings, vp1, vs1, rho1, vp2, vs2, rho2, theta1)?;
    let geoms = snell::snell_with_settings(&settings, vp1, vp2, vs1, vs2, theta1);

    Ok(geoms
        .iter()
        .zip(coeffs.iter())
        .map(|(geom, c)| EnergyPartition::new(&upper, &lower, geom, c))
        .collect())
}
