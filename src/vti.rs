//! Exact PP reflectivity between two VTI media (Daley & Hron, 1977).
//!
//! The closed-form determinant expansion is evaluated in stages, each exposed
//! as its own type or function so intermediate values can be checked:
//! - [`biquadratic_coefficients`]: A1, A2 of the Christoffel biquadratic
//! - [`eigen_q`]: the square-root term Q of the phase-velocity solution
//! - [`phase_velocity`], [`PhaseAngles`]: phase velocities and angles of the
//!   four waves sharing one ray parameter
//! - [`polarization`]: the l, m polarization factors of one wave
//! - [`SlownessFactors`]: the phase-angle cosines P, Q, R, S
//! - [`MediumTerms`]: d, e, w, B for each medium
//! - [`CouplingTerms`]: the boundary coupling terms T1..T12
//! - [`EnergyTerms`]: E1..E6, their sum D and Rpp
//!
//! Wave indices follow the usual convention: 1 is the incident (and reflected)
//! qP wave, 2 the transmitted qP wave, 3 the reflected qSV wave and 4 the
//! transmitted qSV wave. Their phase velocities V1..V4 depend on the phase
//! angle, so every velocity ratio of the expansion is taken per angle.
//! Every quantity is complex, so angles past a critical angle give finite
//! complex coefficients.

use num_complex::Complex64;

use crate::config::SMALL_ANGLE_SIN2;
use crate::error::{ReflectivityError, Result};
use crate::hti;
use crate::layer::Layer;
use crate::settings::Settings;
use crate::thomsen::{self, StiffnessTensor};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ruger::ruger_vti;
    use crate::zoeppritz::zoeppritz;

    const TOL: f64 = 1e-9;

    fn isotropic(vp: f64, vs: f64, rho: f64) -> StiffnessTensor {
        let c33 = rho * vp * vp;
        let c55 = rho * vs * vs;
        StiffnessTensor::from_components(c33, c33 - 2.0 * c55, c33, c55, c55)
    }

    fn anisotropic() -> ReducedStiffness {
        let c = thomsen::cij(0.1, 0.05, 0.08, 2200.0, 3000.0, 1500.0).unwrap();
        ReducedStiffness::new(&c, 2200.0)
    }

    fn close(a: Complex64, b: f64) -> bool {
        (a.re / b - 1.0).abs() < 1e-9 && a.im.abs() < 1e-9 * b.abs()
    }

    #[test]
    fn isotropic_biquadratic_vanishes() {
        let a = ReducedStiffness::new(&isotropic(3000.0, 1500.0, 2200.0), 2200.0);
        let (a1, a2) = biquadratic_coefficients(&a);
        let scale = a.a33 * a.a33;
        assert!(a1.abs() < 1e-12 * scale);
        assert!(a2.abs() < 1e-12 * scale);
        let q = eigen_q(&a, Complex64::from(0.3));
        assert!((q.re - (a.a33 - a.a55)).abs() < 1e-9 * a.a33);
    }

    #[test]
    fn biquadratic_in_thomsen_form() {
        // A1 = (A33 − A55)·A33·(4δ − 2ε), A2 = 8(ε − δ)·A33·(A33 − A55) + 4ε²·A33²
        for (eps, delta) in [(0.1, 0.02), (0.25, -0.1), (0.1, 0.05)] {
            let c = thomsen::cij(eps, delta, 0.0, 2200.0, 3000.0, 1500.0).unwrap();
            let a = ReducedStiffness::new(&c, 2200.0);
            let (a1, a2) = biquadratic_coefficients(&a);
            let scale = a.a33 * a.a33;
            let shear = a.a33 - a.a55;
            assert!((a1 - shear * a.a33 * (4.0 * delta - 2.0 * eps)).abs() < 1e-12 * scale);
            assert!(
                (a2 - 8.0 * (eps - delta) * a.a33 * shear - 4.0 * eps * eps * scale).abs()
                    < 1e-12 * scale
            );
        }
    }

    #[test]
    fn isotropic_polarization_is_unity() {
        let a = ReducedStiffness::new(&isotropic(3000.0, 1500.0, 2200.0), 2200.0);
        for sin2 in [0.0, 0.25, 0.7, 1.0, 1.6] {
            let pol = polarization(&a, Complex64::from(sin2));
            assert!((pol.l - 1.0).norm() < 1e-6, "l = {} at {}", pol.l, sin2);
            assert!((pol.m - 1.0).norm() < 1e-6, "m = {} at {}", pol.m, sin2);
        }
    }

    #[test]
    fn polarizations_are_christoffel_eigenvectors() {
        let a = anisotropic();
        for degrees in [20.0f64, 40.0, 70.0] {
            let (sin, cos) = degrees.to_radians().sin_cos();
            let (sin2, cos2) = (sin * sin, cos * cos);
            let g = [
                [a.a11 * sin2 + a.a55 * cos2, (a.a13 + a.a55) * sin * cos],
                [(a.a13 + a.a55) * sin * cos, a.a55 * sin2 + a.a33 * cos2],
            ];
            let (vp, vs) = phase_velocity(&a, sin2);
            let pol = polarization(&a, Complex64::from(sin2));
            // (l sinθ, m cosθ) is the unit qP vector, (m cosθ, −l sinθ) the unit qSV vector
            for (u, v2) in [
                ([pol.l * sin, pol.m * cos], vp * vp),
                ([pol.m * cos, -pol.l * sin], vs * vs),
            ] {
                assert!((u[0] * u[0] + u[1] * u[1] - 1.0).norm() < 1e-12);
                for (row, ui) in g.iter().zip(u.iter()) {
                    let residual = u[0] * row[0] + u[1] * row[1] - *ui * v2;
                    assert!(residual.norm() < 1e-9 * a.a33, "{}°", degrees);
                }
            }
        }
    }

    #[test]
    fn polarization_limits_are_continuous() {
        let a = anisotropic();
        let at_zero = polarization(&a, Complex64::from(0.0));
        let near_zero = polarization(&a, Complex64::from(1e-7));
        assert!((at_zero.l - near_zero.l).norm() < 1e-5);
        assert!((at_zero.m - near_zero.m).norm() < 1e-5);

        let grazing = polarization(&a, Complex64::from(1.0));
        let near_grazing = polarization(&a, Complex64::from(1.0 - 1e-7));
        assert!((grazing.l - near_grazing.l).norm() < 1e-5);
        assert!((grazing.m - near_grazing.m).norm() < 1e-5);
    }

    #[test]
    fn phase_angles_share_the_ray_parameter() {
        let upper = thomsen::cij(0.1, 0.05, 0.0, 2200.0, 3000.0, 1500.0).unwrap();
        let lower = thomsen::cij(0.2, 0.1, 0.0, 2500.0, 4000.0, 2000.0).unwrap();
        let a = ReducedStiffness::new(&upper, 2200.0);
        let theta = 20f64.to_radians();

        let p = ray_parameter(&a, theta);
        assert!((p / hti::horizontal_slowness(&upper, 2200.0, theta) - 1.0).abs() < 1e-12);

        let waves = PhaseAngles::new(&upper, 2200.0, &lower, 2500.0, p);
        let (vp, vs) = phase_velocity(&a, theta.sin().powi(2));
        assert!(close(waves.incident.velocity, vp));
        assert!(close(waves.incident.sin2, theta.sin().powi(2)));
        assert!(close(waves.reflected_s.velocity, 1508.443010574719));
        assert!((vs - 1530.147465476504).abs() < 1e-6);
        assert!(close(waves.transmitted_p.velocity, 4108.530442566399));
        assert!(close(waves.transmitted_s.velocity, 2039.412118324674));
        for wave in waves.all() {
            assert!((wave.sin2 / (wave.velocity * wave.velocity) - p * p).norm() < 1e-12 * p * p);
            assert!((wave.cos * wave.cos + wave.sin2 - 1.0).norm() < 1e-12);
        }
    }

    #[test]
    fn slowness_factors_at_normal_and_evanescent_incidence() {
        let (upper, lower) = (isotropic(3000.0, 1500.0, 2200.0), isotropic(4000.0, 2000.0, 2500.0));
        let waves = PhaseAngles::new(&upper, 2200.0, &lower, 2500.0, 0.0);
        let f = SlownessFactors::new(&waves);
        for c in [f.p, f.q, f.r, f.s] {
            assert!((c - 1.0).norm() < 1e-12);
        }
        // transmitted P is evanescent; its cosine is on the decaying branch
        let p = 60f64.to_radians().sin() / 3000.0;
        let waves = PhaseAngles::new(&upper, 2200.0, &lower, 2500.0, p);
        let f = SlownessFactors::new(&waves);
        assert!(f.s.re.abs() < 1e-12);
        assert!(f.s.im > 0.0);
    }

    #[test]
    fn staged_terms_at_twenty_degrees() {
        let upper = thomsen::cij(0.1, 0.05, 0.0, 2200.0, 3000.0, 1500.0).unwrap();
        let lower = thomsen::cij(0.2, 0.1, 0.0, 2500.0, 4000.0, 2000.0).unwrap();
        let (a, b) = (
            ReducedStiffness::new(&upper, 2200.0),
            ReducedStiffness::new(&lower, 2500.0),
        );
        let theta = 20f64.to_radians();
        let sin2 = theta.sin().powi(2);
        assert!(close(eigen_q(&a, Complex64::from(sin2)), 6777857.4689845815));

        let waves = PhaseAngles::new(&upper, 2200.0, &lower, 2500.0, ray_parameter(&a, theta));
        let pol = Polarizations::new(&a, &b, &waves);
        assert!(close(pol.incident.l, 1.0706273826446395));
        assert!(close(pol.incident.m, 0.990265902344491));
        assert!(close(pol.transmitted_p.l, 1.139383827908451));
        assert!(close(pol.reflected_s.m, 0.9979315987076978));
        assert!(close(pol.transmitted_s.l, 1.1323459873318493));

        let energy = energy_terms(&upper, &lower, &a, &b, &waves);
        let expected = [
            6635987924805264.0,
            1.6476976105316647e20,
            1.2390850371486007e20,
            5.387512053900055e18,
            1.1402579071131764e20,
            8.547594439322396e19,
        ];
        for (e, x) in energy.e.iter().zip(expected.iter()) {
            assert!(close(*e, *x), "{} vs {}", e, x);
        }
        assert!(close(energy.rpp(), 0.1915769011181285));
    }

    #[test]
    fn energy_terms_at_normal_incidence() {
        // x = 0 removes the terms carrying sin²θ
        let rpp = exact_vti_thomsen(
            3000.0, 1500.0, 2200.0, 0.1, 0.05, 4000.0, 2000.0, 2500.0, 0.2, 0.1, &[0.0],
        )
        .unwrap();
        assert!((rpp[0].re - 0.20481927710843378).abs() < TOL);
        assert!(rpp[0].im.abs() < TOL);
    }

    #[test]
    fn isotropic_limit_matches_zoeppritz() {
        let (vp1, vs1, rho1, vp2, vs2, rho2) = (3000.0, 1500.0, 2200.0, 4000.0, 2000.0, 2500.0);
        let angles: Vec<f64> = [0.0f64, 10.0, 30.0, 45.0, 60.0, 80.0]
            .iter()
            .map(|d| d.to_radians())
            .collect();
        let (c1, c2) = (isotropic(vp1, vs1, rho1), isotropic(vp2, vs2, rho2));
        let rpp = exact_vti(
            vp1, vp2, vs1, vs2, rho1, rho2, &angles,
            c1.c11(), c1.c13(), c1.c33(), c1.c55(),
            c2.c11(), c2.c13(), c2.c33(), c2.c55(),
        )
        .unwrap();
        let exact = zoeppritz(vp1, vs1, rho1, vp2, vs2, rho2, &angles).unwrap();
        for (r, z) in rpp.iter().zip(exact.iter()) {
            assert!((r - z.rpp).norm() < TOL, "{} vs {}", r, z.rpp);
        }
    }

    #[test]
    fn agrees_with_christoffel_solver() {
        // the tensors are already in the incidence-plane frame, so the
        // impedance-matrix solver applies unrotated
        let upper = thomsen::cij(0.1, 0.05, 0.0, 2200.0, 3000.0, 1500.0).unwrap();
        let lower = thomsen::cij(0.2, 0.1, 0.0, 2500.0, 4000.0, 2000.0).unwrap();
        let angles: Vec<f64> = [0.0f64, 10.0, 20.0, 30.0, 45.0, 60.0, 80.0]
            .iter()
            .map(|d| d.to_radians())
            .collect();
        let rpp = exact_vti_thomsen(
            3000.0, 1500.0, 2200.0, 0.1, 0.05, 4000.0, 2000.0, 2500.0, 0.2, 0.1, &angles,
        )
        .unwrap();
        let reference =
            hti::exact_hti_tensors(&Settings::default(), &upper, 2200.0, &lower, 2500.0, &angles)
                .unwrap();
        for (r, m) in rpp.iter().zip(reference.iter()) {
            assert!((r - m[(0, 0)]).norm() < TOL, "{} vs {}", r, m[(0, 0)]);
        }
    }

    #[test]
    fn weak_anisotropy_matches_ruger() {
        let angles: Vec<f64> = [10.0f64, 20.0, 30.0].iter().map(|d| d.to_radians()).collect();
        let exact = exact_vti_thomsen(
            3000.0, 1500.0, 2200.0, 0.0, 0.0, 3000.0, 1500.0, 2200.0, 0.02, 0.01, &angles,
        )
        .unwrap();
        let approx = ruger_vti(
            3000.0, 1500.0, 2200.0, 0.0, 0.0, 3000.0, 1500.0, 2200.0, 0.02, 0.01, &angles,
        )
        .unwrap();
        for (e, r) in exact.iter().zip(approx.iter()) {
            assert!(e.im.abs() < 1e-12);
            assert!((e.re - r).abs() < 0.01 * r.abs(), "{} vs {}", e, r);
        }
    }

    #[test]
    fn anisotropic_reference_values() {
        let angles: Vec<f64> = [0.0f64, 20.0, 30.0].iter().map(|d| d.to_radians()).collect();
        let rpp = exact_vti_thomsen(
            3000.0, 1500.0, 2200.0, 0.1, 0.05, 4000.0, 2000.0, 2500.0, 0.2, 0.1, &angles,
        )
        .unwrap();
        assert!((rpp[1].re - 0.1915769011181285).abs() < TOL);
        assert!((rpp[2].re - 0.21325851554207229).abs() < TOL);
    }

    #[test]
    fn identical_media_do_not_reflect() {
        let angles = [0.1, 0.4, 0.9];
        let rpp = exact_vti_thomsen(
            3000.0, 1500.0, 2200.0, 0.1, 0.05, 3000.0, 1500.0, 2200.0, 0.1, 0.05, &angles,
        )
        .unwrap();
        assert!(rpp.iter().all(|r| r.norm() < TOL));
    }

    #[test]
    fn thomsen_form_honours_settings() {
        // |D| never exceeds Σ|Ei|, so no angle meets this tolerance
        let strict = Settings {
            singular_tolerance: 2.0,
            ..Settings::default()
        };
        let err = exact_vti_thomsen_with_settings(
            &strict, 3000.0, 1500.0, 2200.0, 0.1, 0.05, 4000.0, 2000.0, 2500.0, 0.2, 0.1, &[0.3],
        )
        .unwrap_err();
        assert!(matches!(err, ReflectivityError::SingularMatrix { index: 0, .. }));
    }

    #[test]
    fn requires_shear_waves() {
        let err = exact_vti_thomsen(
            1500.0, 0.0, 1000.0, 0.0, 0.0, 1800.0, 0.0, 1100.0, 0.0, 0.0, &[0.1],
        )
        .unwrap_err();
        assert!(matches!(err, ReflectivityError::Domain { .. }));
    }

    #[test]
    fn empty_input() {
        let rpp = exact_vti_thomsen(
            3000.0, 1500.0, 2200.0, 0.1, 0.05, 4000.0, 2000.0, 2500.0, 0.2, 0.1, &[],
        )
        .unwrap();
        assert!(rpp.is_empty());
    }
}

/// Stiffness components of the vertical plane divided by density.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReducedStiffness {
    pub a11: f64,
    pub a13: f64,
    pub a33: f64,
    pub a55: f64,
}

impl ReducedStiffness {
    pub fn new(c: &StiffnessTensor, rho: f64) -> Self {
        Self {
            a11: c.c11() / rho,
            a13: c.c13() / rho,
            a33: c.c33() / rho,
            a55: c.c55() / rho,
        }
    }

    /// A11 + A33 − 2·A55
    fn k(&self) -> f64 {
        self.a11 + self.a33 - 2.0 * self.a55
    }
}

/// Coefficients A1, A2 of the biquadratic Q² = (A33 − A55)² + 2·A1·sin²θ + A2·sin⁴θ.
pub fn biquadratic_coefficients(a: &ReducedStiffness) -> (f64, f64) {
    let k = a.k();
    let coupling = (a.a13 + a.a55).powi(2);
    (
        2.0 * coupling - (a.a33 - a.a55) * k,
        k * k - 4.0 * coupling,
    )
}

/// Q for a phase angle with squared sine `sin2`.
pub fn eigen_q(a: &ReducedStiffness, sin2: Complex64) -> Complex64 {
    let (a1, a2) = biquadratic_coefficients(a);
    ((a.a33 - a.a55).powi(2) + 2.0 * a1 * sin2 + a2 * sin2 * sin2).sqrt()
}

/// Phase velocities (qP, qSV) at a real phase angle with squared sine `sin2`,
/// from V² = (A11·sin²θ + A33·cos²θ + A55 ± Q) / 2.
pub fn phase_velocity(a: &ReducedStiffness, sin2: f64) -> (f64, f64) {
    let q = eigen_q(a, Complex64::from(sin2)).re;
    let base = a.a11 * sin2 + a.a33 * (1.0 - sin2) + a.a55;
    ((0.5 * (base + q)).sqrt(), (0.5 * (base - q)).sqrt())
}

/// Horizontal slowness of a qP wave at phase angle `theta` in medium `a`.
pub fn ray_parameter(a: &ReducedStiffness, theta: f64) -> f64 {
    let sin = theta.sin();
    sin / phase_velocity(a, sin * sin).0
}

/// Phase geometry of one wave.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseWave {
    pub sin2: Complex64,
    /// cos θ, on the decaying branch when evanescent
    pub cos: Complex64,
    pub velocity: Complex64,
}

impl PhaseWave {
    /// Wave with horizontal slowness `p` and vertical slowness `q`.
    pub fn new(p: f64, q: Complex64) -> Self {
        let slowness2 = q * q + p * p;
        let velocity = slowness2.sqrt().inv();
        Self {
            sin2: p * p / slowness2,
            cos: q * velocity,
            velocity,
        }
    }
}

/// Phase geometry of the four waves sharing one ray parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseAngles {
    pub incident: PhaseWave,
    pub transmitted_p: PhaseWave,
    pub reflected_s: PhaseWave,
    pub transmitted_s: PhaseWave,
}

impl PhaseAngles {
    /// Solves the Christoffel relation of each medium for the vertical
    /// slownesses at ray parameter `p`.
    pub fn new(
        upper: &StiffnessTensor,
        rho1: f64,
        lower: &StiffnessTensor,
        rho2: f64,
        p: f64,
    ) -> Self {
        let (q1, q3) = hti::vertical_slownesses(upper, rho1, p);
        let (q2, q4) = hti::vertical_slownesses(lower, rho2, p);
        Self {
            incident: PhaseWave::new(p, q1),
            transmitted_p: PhaseWave::new(p, q2),
            reflected_s: PhaseWave::new(p, q3),
            transmitted_s: PhaseWave::new(p, q4),
        }
    }

    pub fn all(&self) -> [PhaseWave; 4] {
        [
            self.incident,
            self.transmitted_p,
            self.reflected_s,
            self.transmitted_s,
        ]
    }
}

/// Polarization factors of one wave.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Polarization {
    pub l: Complex64,
    pub m: Complex64,
}

impl Polarization {
    fn sum(&self) -> Complex64 {
        self.l + self.m
    }
}

/// Polarization factors l, m for a wave with squared phase sine `sin2`.
///
/// The ratios (Q − A33 + A55)/sin²θ and (Q − A11 + A55)/cos²θ are both 0/0
/// at their endpoints; there the limits A1/(A33 − A55) and
/// −(A1 + A2)/(A11 − A55) are used.
pub fn polarization(a: &ReducedStiffness, sin2: Complex64) -> Polarization {
    let (a1, a2) = biquadratic_coefficients(a);
    let q = eigen_q(a, sin2);
    let k = a.k();
    let cos2 = 1.0 - sin2;

    let l_ratio = if sin2.norm() < SMALL_ANGLE_SIN2 {
        Complex64::from(a1 / (a.a33 - a.a55))
    } else {
        (q - a.a33 + a.a55) / sin2
    };
    let m_ratio = if cos2.norm() < SMALL_ANGLE_SIN2 {
        Complex64::from(-(a1 + a2) / (a.a11 - a.a55))
    } else {
        (q - a.a11 + a.a55) / cos2
    };

    Polarization {
        l: ((l_ratio + k) / (2.0 * q)).sqrt(),
        m: ((m_ratio + k) / (2.0 * q)).sqrt(),
    }
}

/// Polarizations of the four scattered waves at one ray parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Polarizations {
    pub incident: Polarization,
    pub transmitted_p: Polarization,
    pub reflected_s: Polarization,
    pub transmitted_s: Polarization,
}

impl Polarizations {
    /// Each wave is polarized at its own phase angle in its own medium.
    pub fn new(upper: &ReducedStiffness, lower: &ReducedStiffness, waves: &PhaseAngles) -> Self {
        Self {
            incident: polarization(upper, waves.incident.sin2),
            transmitted_p: polarization(lower, waves.transmitted_p.sin2),
            reflected_s: polarization(upper, waves.reflected_s.sin2),
            transmitted_s: polarization(lower, waves.transmitted_s.sin2),
        }
    }
}

/// Phase-angle cosines, P = cos θ1, Q = cos φ1, R = cos φ2 and S = cos θ2.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlownessFactors {
    pub p: Complex64,
    pub q: Complex64,
    pub r: Complex64,
    pub s: Complex64,
}

impl SlownessFactors {
    pub fn new(waves: &PhaseAngles) -> Self {
        Self {
            p: waves.incident.cos,
            q: waves.reflected_s.cos,
            r: waves.transmitted_s.cos,
            s: waves.transmitted_p.cos,
        }
    }
}

/// Per-medium terms d, e, w and B = C55.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediumTerms {
    pub d: Complex64,
    pub e: Complex64,
    pub w: Complex64,
    pub b: f64,
}

impl MediumTerms {
    /// Terms for a medium whose qP and qSV waves have polarizations `p_wave`,
    /// `s_wave` and phase geometry `p_phase`, `s_phase`.
    ///
    /// `e_scale` is 1 for the incidence medium and V1/V2 for the other;
    /// `w_scale` is V1/Vs divided by l1 + m1 of the incident wave.
    pub fn new(
        c: &StiffnessTensor,
        p_wave: &Polarization,
        p_phase: &PhaseWave,
        s_wave: &Polarization,
        s_phase: &PhaseWave,
        e_scale: Complex64,
        w_scale: Complex64,
    ) -> Self {
        let (c13, c33) = (c.c13(), c.c33());
        let (cos2_p, cos2_s) = (1.0 - p_phase.sin2, 1.0 - s_phase.sin2);
        Self {
            d: s_wave.l * c33 - s_wave.m * c13,
            e: e_scale * (p_wave.l * c13 + (p_wave.m * c33 - p_wave.l * c13) * cos2_p),
            w: w_scale * (s_wave.m * cos2_s - s_wave.l * s_phase.sin2),
            b: c.c55(),
        }
    }
}

/// Boundary coupling terms T1..T12.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CouplingTerms {
    pub t: [Complex64; 12],
}

impl CouplingTerms {
    /// `n = V1/V2`, `k1 = V3/V1`, `k2 = V4/V2` and `x2 = sin²θ1`.
    pub fn new(
        n: Complex64,
        k1: Complex64,
        k2: Complex64,
        x2: Complex64,
        upper: &MediumTerms,
        lower: &MediumTerms,
        pol: &Polarizations,
    ) -> Self {
        let (l1, m1) = (pol.incident.l, pol.incident.m);
        let (l2, m2) = (pol.transmitted_p.l, pol.transmitted_p.m);
        let (l3, m3) = (pol.reflected_s.l, pol.reflected_s.m);
        let (l4, m4) = (pol.transmitted_s.l, pol.transmitted_s.m);
        let (d1, e1, w1, b1) = (upper.d, upper.e, upper.w, upper.b);
        let (d2, e2, w2, b2) = (lower.d, lower.e, lower.w, lower.b);
        let l = pol.transmitted_p.sum() / pol.incident.sum();

        Self {
            t: [
                e2 - e1 * l2 / (n * l1),
                b2 * w2 * k1 * l3 / m1 - b1 * w1 * k2 * l4 / (n * m1),
                b2 * w2 + b1 * k2 * x2 * l4 / (n * m1),
                e2 * m3 / l1 + d1 * x2 * l2 / (n * l1),
                b1 * (w1 + k1 * x2 * l3 / m1),
                e2 * m4 / l1 + d2 * x2 * l2 / (n * l1),
                b2 * l - b1 * m2 / m1,
                d2 * m3 / l1 - d1 * m4 / l1,
                b2 * (w2 * m2 / m1 + k2 * x2 * l * l4 / (n * m1)),
                e1 * m3 / l1 + d1 * x2,
                e1 * m4 / l1 + d2 * x2,
                b2 * k1 * x2 * l * l3 / m1 + b1 * w1 * m2 / m1,
            ],
        }
    }
}

/// Energy terms E1..E6 of the determinant expansion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyTerms {
    pub e: [Complex64; 6],
}

impl EnergyTerms {
    pub fn new(t: &CouplingTerms, f: &SlownessFactors, x2: Complex64) -> Self {
        let t = &t.t;
        Self {
            e: [
                t[0] * t[1] * x2,
                t[2] * t[3] * f.p * f.q,
                t[4] * t[5] * f.p * f.r,
                t[6] * t[7] * x2 * f.p * f.q * f.r * f.s,
                t[8] * t[9] * f.q * f.s,
                t[10] * t[11] * f.r * f.s,
            ],
        }
    }

    /// D = E1 + … + E6.
    pub fn denominator(&self) -> Complex64 {
        self.e.iter().sum()
    }

    /// |D| relative to Σ|Ei|; zero when the terms cancel completely.
    pub fn conditioning(&self) -> f64 {
        let scale: f64 = self.e.iter().map(|e| e.norm()).sum();
        if scale == 0.0 || !scale.is_finite() {
            return 0.0;
        }
        self.denominator().norm() / scale
    }

    /// Rpp = (−E1 + E2 + E3 + E4 − E5 − E6) / D.
    pub fn rpp(&self) -> Complex64 {
        let e = &self.e;
        (-e[0] + e[1] + e[2] + e[3] - e[4] - e[5]) / self.denominator()
    }
}

/// Runs the expansion from the phase geometry of one ray parameter.
fn energy_terms(
    upper: &StiffnessTensor,
    lower: &StiffnessTensor,
    a: &ReducedStiffness,
    b: &ReducedStiffness,
    waves: &PhaseAngles,
) -> EnergyTerms {
    let pol = Polarizations::new(a, b, waves);
    let (v1, v2) = (waves.incident.velocity, waves.transmitted_p.velocity);
    let (v3, v4) = (waves.reflected_s.velocity, waves.transmitted_s.velocity);
    let lm1 = pol.incident.sum();

    let upper_terms = MediumTerms::new(
        upper,
        &pol.incident,
        &waves.incident,
        &pol.reflected_s,
        &waves.reflected_s,
        Complex64::from(1.0),
        v1 / v3 / lm1,
    );
    let lower_terms = MediumTerms::new(
        lower,
        &pol.transmitted_p,
        &waves.transmitted_p,
        &pol.transmitted_s,
        &waves.transmitted_s,
        v1 / v2,
        v1 / v4 / lm1,
    );

    let x2 = waves.incident.sin2;
    let coupling = CouplingTerms::new(
        v1 / v2,
        v3 / v1,
        v4 / v2,
        x2,
        &upper_terms,
        &lower_terms,
        &pol,
    );
    EnergyTerms::new(&coupling, &SlownessFactors::new(waves), x2)
}

/// Exact Rpp between two VTI media from their vertical-plane stiffnesses.
///
/// `v1`..`v4` are Vp1, Vp2, Vs1, Vs2 along the symmetry axis and are only
/// validated; the phase velocities of each wave come from the stiffnesses.
/// `theta1` holds phase angles of the incident qP wave.
#[allow(clippy::too_many_arguments)]
pub fn exact_vti(
    v1: f64,
    v2: f64,
    v3: f64,
    v4: f64,
    rho1: f64,
    rho2: f64,
    theta1: &[f64],
    c1_11: f64,
    c1_13: f64,
    c1_33: f64,
    c1_55: f64,
    c2_11: f64,
    c2_13: f64,
    c2_33: f64,
    c2_55: f64,
) -> Result<Vec<Complex64>> {
    exact_vti_with_settings(
        &Settings::default(),
        v1,
        v2,
        v3,
        v4,
        rho1,
        rho2,
        theta1,
        c1_11,
        c1_13,
        c1_33,
        c1_55,
        c2_11,
        c2_13,
        c2_33,
        c2_55,
    )
}

/// [`exact_vti`] with explicit tolerances.
#[allow(clippy::too_many_arguments)]
pub fn exact_vti_with_settings(
    settings: &Settings,
    v1: f64,
    v2: f64,
    v3: f64,
    v4: f64,
    rho1: f64,
    rho2: f64,
    theta1: &[f64],
    c1_11: f64,
    c1_13: f64,
    c1_33: f64,
    c1_55: f64,
    c2_11: f64,
    c2_13: f64,
    c2_33: f64,
    c2_55: f64,
) -> Result<Vec<Complex64>> {
    let upper = StiffnessTensor::from_components(c1_11, c1_13, c1_33, c1_55, c1_55);
    let lower = StiffnessTensor::from_components(c2_11, c2_13, c2_33, c2_55, c2_55);
    solve(settings, v1, v2, v3, v4, rho1, rho2, &upper, &lower, theta1)
}

/// [`exact_vti`] with the stiffnesses built from Thomsen ε and δ of each
/// layer and its vertical velocities.
#[allow(clippy::too_many_arguments)]
pub fn exact_vti_thomsen(
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
) -> Result<Vec<Complex64>> {
    exact_vti_thomsen_with_settings(
        &Settings::default(),
        vp1,
        vs1,
        rho1,
        e1,
        d1,
        vp2,
        vs2,
        rho2,
        e2,
        d2,
        theta1,
    )
}

/// [`exact_vti_thomsen`] with explicit tolerances.
#[allow(clippy::too_many_arguments)]
pub fn exact_vti_thomsen_with_settings(
    settings: &Settings,
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
) -> Result<Vec<Complex64>> {
    // SH waves decouple in the incidence plane, so γ does not enter Rpp
    let upper = thomsen::cij(e1, d1, 0.0, rho1, vp1, vs1)?;
    let lower = thomsen::cij(e2, d2, 0.0, rho2, vp2, vs2)?;
    solve(
        settings, vp1, vp2, vs1, vs2, rho1, rho2, &upper, &lower, theta1,
    )
}

#[allow(clippy::too_many_arguments)]
fn solve(
    settings: &Settings,
    v1: f64,
    v2: f64,
    v3: f64,
    v4: f64,
    rho1: f64,
    rho2: f64,
    upper: &StiffnessTensor,
    lower: &StiffnessTensor,
    theta1: &[f64],
) -> Result<Vec<Complex64>> {
    Layer::new("exact_vti", v1, v3, rho1)?;
    Layer::new("exact_vti", v2, v4, rho2)?;
    if !(v3 > 0.0 && v4 > 0.0) {
        return Err(ReflectivityError::domain(
            "exact_vti",
            "both media need a positive S velocity",
        ));
    }
    for c in [upper, lower] {
        if !(c.c55() > 0.0 && c.c33() > c.c55() && c.c11() > c.c55()) {
            return Err(ReflectivityError::domain(
                "exact_vti",
                format!(
                    "requires C33 > C55 > 0 and C11 > C55, got C11 = {}, C33 = {}, C55 = {}",
                    c.c11(),
                    c.c33(),
                    c.c55()
                ),
            ));
        }
    }
    log::debug!("exact_vti: solving {} angles", theta1.len());

    let a = ReducedStiffness::new(upper, rho1);
    let b = ReducedStiffness::new(lower, rho2);

    theta1
        .iter()
        .enumerate()
        .map(|(index, &theta)| {
            let waves = PhaseAngles::new(upper, rho1, lower, rho2, ray_parameter(&a, theta));
            let energy = energy_terms(upper, lower, &a, &b, &waves);

            let conditioning = energy.conditioning();
            if !(conditioning >= settings.singular_tolerance) {
                log::warn!(
                    "exact_vti: singular system at angle index {} (theta1 = {})",
                    index,
                    theta
                );
                return Err(ReflectivityError::SingularMatrix {
                    formula: "exact_vti",
                    index,
                    conditioning,
                    tolerance: settings.singular_tolerance,
                });
            }
            Ok(energy.rpp())
        })
        .collect()
}
