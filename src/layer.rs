//! Elastic layer properties and the contrasts between two layers.

use serde::{Deserialize, Serialize};

use crate::error::{ReflectivityError, Result};


/// An isotropic elastic layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub vp: f64,
    pub vs: f64,
    pub rho: f64,
}

impl Layer {
    /// Validate and build a layer. `formula` names the calling operation in
    /// the error.
    pub fn new(formula: &'static str, vp: f64, vs: f64, rho: f64) -> Result<Self> {
        if !(vp.is_finite() && vp > 0.0) {
            return Err(ReflectivityError::domain(
                formula,
                format!("P velocity must be positive, got {}", vp),
            ));
        }
        if !(rho.is_finite() && rho > 0.0) {
            return Err(ReflectivityError::domain(
                formula,
                format!("density must be positive, got {}", rho),
            ));
        }
        if !(vs.is_finite() && vs >= 0.0) {
            return Err(ReflectivityError::domain(
                formula,
                format!("S velocity must be non-negative, got {}", vs),
            ));
        }
        if vs >= vp {
            return Err(ReflectivityError::domain(
                formula,
                format!("S velocity {} must be below P velocity {}", vs, vp),
            ));
        }
        Ok(Self { vp, vs, rho })
    }

    /// Acoustic impedance ρ·Vp.
    pub fn impedance(&self) -> f64 {
        self.rho * self.vp
    }

    /// Shear modulus ρ·Vs².
    pub fn shear_modulus(&self) -> f64 {
        self.rho * self.vs * self.vs
    }
}

/// Layer averages and upper-to-lower differences used by the weak-contrast formulas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contrast {
    pub vp: f64,
    pub vs: f64,
    pub rho: f64,
    pub impedance: f64,
    pub shear_modulus: f64,
    pub dvp: f64,
    pub dvs: f64,
    pub drho: f64,
    pub dimpedance: f64,
    pub dshear_modulus: f64,
}

impl Contrast {
    pub fn new(upper: &Layer, lower: &Layer) -> Self {
        Self {
            vp: (upper.vp + lower.vp) / 2.0,
            vs: (upper.vs + lower.vs) / 2.0,
            rho: (upper.rho + lower.rho) / 2.0,
            impedance: (upper.impedance() + lower.impedance()) / 2.0,
            shear_modulus: (upper.shear_modulus() + lower.shear_modulus()) / 2.0,
            dvp: lower.vp - upper.vp,
            dvs: lower.vs - upper.vs,
            drho: lower.rho - upper.rho,
            dimpedance: lower.impedance() - upper.impedance(),
            dshear_modulus: lower.shear_modulus() - upper.shear_modulus(),
        }
    }
}
