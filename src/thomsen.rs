//! Conversion between Thomsen anisotropy parameters and stiffness tensors.
//!
//! A transversely isotropic medium is described either by its stiffness
//! tensor in Voigt notation or by the vertical velocities and density
//! together with the dimensionless Thomsen (1986) parameters:
//! - ε: fractional difference between horizontal and vertical P velocity
//! - δ: near-vertical P anellipticity
//! - γ: fractional difference between horizontal and vertical SH velocity
//! - δᵥ: the δ of the same medium with its symmetry axis laid horizontal,
//!   as seen in the vertical plane containing the axis (HTI δ^(V))
//!
//! Tensors here always have the symmetry axis along x3 (VTI) unless
//! explicitly rotated with [`StiffnessTensor::to_horizontal_axis`].

use nalgebra::Matrix6;
use serde::Serialize;

use crate::error::{ReflectivityError, Result};
use crate::layer::Layer;

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= TOL * b.abs().max(1.0)
    }

    #[test]
    fn cij_reference_values() {
        let c = cij(0.1, 0.05, 0.08, 2200.0, 3000.0, 1500.0).unwrap();
        assert!(close(c.c11(), 2.376e10));
        assert!(close(c.c13(), 10859032228.4446));
        assert!(close(c.c33(), 1.98e10));
        assert!(close(c.c55(), 4.95e9));
        assert!(close(c.c66(), 5.742e9));
        assert!(close(c.c44(), c.c55()));
        assert!(close(c.c12(), c.c11() - 2.0 * c.c66()));
    }

    #[test]
    fn tensor_is_symmetric() {
        let c = cij(0.2, -0.05, 0.1, 2400.0, 3500.0, 1800.0).unwrap();
        assert_eq!(c.matrix(), &c.matrix().transpose());
        assert_eq!(c.matrix()[(0, 3)], 0.0);
        assert_eq!(c.matrix()[(4, 5)], 0.0);
    }

    #[test]
    fn round_trip() {
        let original = StiffnessTensor::from_components(3.1e10, 9.0e9, 2.6e10, 7.0e9, 8.2e9);
        let params = thomsen(&original).unwrap();
        let rho = 2400.0;
        let vp = (original.c33() / rho).sqrt();
        let vs = (original.c55() / rho).sqrt();
        let rebuilt = cij(params.epsilon, params.delta, params.gamma, rho, vp, vs).unwrap();
        for i in 0..6 {
            for j in 0..6 {
                let (a, b) = (rebuilt.matrix()[(i, j)], original.matrix()[(i, j)]);
                assert!((a - b).abs() < 1e-6 * original.c11(), "C{}{}: {} vs {}", i + 1, j + 1, a, b);
            }
        }
    }

    #[test]
    fn isotropic_tensor_has_zero_parameters() {
        let c = cij(0.0, 0.0, 0.0, 2200.0, 3000.0, 1500.0).unwrap();
        let params = thomsen(&c).unwrap();
        assert!(params.epsilon.abs() < TOL);
        assert!(params.delta.abs() < TOL);
        assert!(params.gamma.abs() < TOL);
        assert!(params.delta_v.abs() < TOL);
    }

    #[test]
    fn horizontal_axis_swaps_x_and_z() {
        let c = cij(0.1, 0.05, 0.08, 2200.0, 3000.0, 1500.0).unwrap();
        let h = c.to_horizontal_axis();
        assert_eq!(h.c11(), c.c33());
        assert_eq!(h.c33(), c.c11());
        assert_eq!(h.c13(), c.c13());
        assert_eq!(h.c55(), c.c55());
        assert_eq!(h.c44(), c.c66());
        assert_eq!(h.c66(), c.c44());
        assert_eq!(h.to_horizontal_axis(), c);
    }

    #[test]
    fn delta_v_is_delta_of_rotated_tensor() {
        let c = StiffnessTensor::from_components(3.1e10, 9.0e9, 2.6e10, 7.0e9, 8.2e9);
        let (c11, c13, c55) = (c.c11(), c.c13(), c.c55());
        let expected =
            ((c13 + c55).powi(2) - (c11 - c55).powi(2)) / (2.0 * c11 * (c11 - c55));
        assert!(close(thomsen(&c).unwrap().delta_v, expected));
    }

    #[test]
    fn thomsen_domain_errors() {
        let degenerate = StiffnessTensor::from_components(3.0e10, 9.0e9, 7.0e9, 7.0e9, 8.0e9);
        assert!(matches!(
            thomsen(&degenerate),
            Err(ReflectivityError::Domain { .. })
        ));
        let no_shear = StiffnessTensor::from_components(3.0e10, 9.0e9, 2.0e10, 0.0, 0.0);
        assert!(thomsen(&no_shear).is_err());
    }

    #[test]
    fn cij_domain_errors() {
        // 1 + 2δ/f < 0
        assert!(cij(0.1, -0.5, 0.0, 2200.0, 3000.0, 1500.0).is_err());
        // vs = vp gives f = 0
        assert!(cij(0.1, 0.05, 0.0, 2200.0, 3000.0, 3000.0).is_err());
        assert!(cij(0.1, 0.05, 0.0, -1.0, 3000.0, 1500.0).is_err());
    }
}

/// Thomsen parameters of a transversely isotropic medium.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThomsenParameters {
    pub epsilon: f64,
    pub delta: f64,
    pub gamma: f64,
    pub delta_v: f64,
}

/// Symmetric 6×6 stiffness tensor in Voigt notation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StiffnessTensor(Matrix6<f64>);

impl StiffnessTensor {
    /// Build a VTI tensor from its five independent components.
    ///
    /// The remaining entries follow from the symmetry: C22 = C11,
    /// C23 = C13, C44 = C55 and C12 = C11 − 2·C66.
    pub fn from_components(c11: f64, c13: f64, c33: f64, c55: f64, c66: f64) -> Self {
        let c12 = c11 - 2.0 * c66;
        let mut m = Matrix6::zeros();
        m[(0, 0)] = c11;
        m[(1, 1)] = c11;
        m[(2, 2)] = c33;
        m[(3, 3)] = c55;
        m[(4, 4)] = c55;
        m[(5, 5)] = c66;
        m[(0, 1)] = c12;
        m[(1, 0)] = c12;
        m[(0, 2)] = c13;
        m[(2, 0)] = c13;
        m[(1, 2)] = c13;
        m[(2, 1)] = c13;
        Self(m)
    }

    pub fn matrix(&self) -> &Matrix6<f64> {
        &self.0
    }

    pub fn c11(&self) -> f64 {
        self.0[(0, 0)]
    }

    pub fn c12(&self) -> f64 {
        self.0[(0, 1)]
    }

    pub fn c13(&self) -> f64 {
        self.0[(0, 2)]
    }

    pub fn c33(&self) -> f64 {
        self.0[(2, 2)]
    }

    pub fn c44(&self) -> f64 {
        self.0[(3, 3)]
    }

    pub fn c55(&self) -> f64 {
        self.0[(4, 4)]
    }

    pub fn c66(&self) -> f64 {
        self.0[(5, 5)]
    }

    /// Rotate the symmetry axis from x3 onto x1.
    ///
    /// Exchanging the x and z axes permutes Voigt indices 1 ↔ 3 and 4 ↔ 6;
    /// index 5 (the xz shear) is unchanged. Applying it twice is the identity.
    pub fn to_horizontal_axis(&self) -> Self {
        let mut m = self.0;
        m.swap_rows(0, 2);
        m.swap_columns(0, 2);
        m.swap_rows(3, 5);
        m.swap_columns(3, 5);
        Self(m)
    }
}

/// Thomsen parameters of a VTI stiffness tensor.
///
/// **Context**: Weak-anisotropy formulas are written in terms of ε, δ and γ
/// rather than in stiffness components, and the HTI approximations need the
/// δ of the rotated medium as well.
///
/// **How it Works**: Evaluates the Thomsen ratios
/// - ε = (C11 − C33) / 2C33
/// - γ = (C66 − C55) / 2C55
/// - δ = ((C13 + C55)² − (C33 − C55)²) / (2·C33·(C33 − C55))
///
/// and the same δ ratio on [`StiffnessTensor::to_horizontal_axis`] for δᵥ.
/// Requires C33 > C55 > 0 and C11 > C55.
pub fn thomsen(c: &StiffnessTensor) -> Result<ThomsenParameters> {
    let (c11, c33, c55, c66) = (c.c11(), c.c33(), c.c55(), c.c66());
    if !(c55 > 0.0 && c33 > c55) {
        return Err(ReflectivityError::domain(
            "thomsen",
            format!("requires C33 > C55 > 0, got C33 = {} and C55 = {}", c33, c55),
        ));
    }
    if !(c11 > c55) {
        return Err(ReflectivityError::domain(
            "thomsen",
            format!("requires C11 > C55, got C11 = {} and C55 = {}", c11, c55),
        ));
    }

    Ok(ThomsenParameters {
        epsilon: (c11 - c33) / (2.0 * c33),
        delta: vertical_delta(c),
        gamma: (c66 - c55) / (2.0 * c55),
        delta_v: vertical_delta(&c.to_horizontal_axis()),
    })
}

/// δ measured about the x3 axis of `c`.
fn vertical_delta(c: &StiffnessTensor) -> f64 {
    let (c13, c33, c55) = (c.c13(), c.c33(), c.c55());
    ((c13 + c55).powi(2) - (c33 - c55).powi(2)) / (2.0 * c33 * (c33 - c55))
}

/// VTI stiffness tensor from Thomsen parameters, density and the vertical
/// P and S velocities.
///
/// With f = 1 − (Vs/Vp)² and d̃ = f·(√(1 + 2δ/f) − 1):
/// - C33 = ρVp², C55 = C44 = ρVs²
/// - C11 = C33·(1 + 2ε), C66 = C55·(1 + 2γ)
/// - C13 = C33·(2f + d̃ − 1)
pub fn cij(
    epsilon: f64,
    delta: f64,
    gamma: f64,
    rho: f64,
    vp: f64,
    vs: f64,
) -> Result<StiffnessTensor> {
    Layer::new("cij", vp, vs, rho)?;

    let f = 1.0 - (vs / vp).powi(2);
    let radicand = 1.0 + 2.0 * delta / f;
    if !(radicand >= 0.0) {
        return Err(ReflectivityError::domain(
            "cij",
            format!(
                "1 + 2δ/f = {} is negative (δ = {}, f = {})",
                radicand, delta, f
            ),
        ));
    }
    let d_tilde = f * (radicand.sqrt() - 1.0);

    let c33 = rho * vp * vp;
    let c55 = c33 * (1.0 - f);
    Ok(StiffnessTensor::from_components(
        c33 * (1.0 + 2.0 * epsilon),
        c33 * (2.0 * f + d_tilde - 1.0),
        c33,
        c55,
        c55 * (1.0 + 2.0 * gamma),
    ))
}
