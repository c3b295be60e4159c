//! Snell's-law ray geometry for an incident P wave at a planar interface.
//!
//! This module traces an incident P wave from the upper layer across the
//! interface, producing the ray parameter and the reflected and transmitted
//! angles that every reflectivity formula is evaluated on.
//!
//! The ray tracer provides:
//! - Ray parameter (horizontal slowness) conserved across the interface
//! - Reflected S angle in the upper layer
//! - Transmitted P and S angles in the lower layer
//! - Explicit classification of the post-critical regimes
//!
//! # Critical Regimes
//!
//! With θ_crit1 = arcsin(Vp1/Vp2) and θ_crit2 = arcsin(Vp1/Vs2):
//! - below θ_crit1 both transmitted modes propagate
//! - from θ_crit1 the transmitted P wave is evanescent
//! - from θ_crit2 both transmitted modes are evanescent
//!
//! A critical angle only exists when the corresponding lower-layer velocity
//! exceeds Vp1, so the regimes are decided on the transmitted sines instead.

use serde::Serialize;

use crate::config::CRITICAL_ANGLE_TOLERANCE;
use crate::settings::Settings;


/// State of the transmitted wavefield for one incidence angle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Transmission {
    /// Both transmitted P and S propagate.
    Propagating { theta2: f64, thetas2: f64 },
    /// Transmitted P is evanescent, transmitted S propagates.
    PostCriticalP { thetas2: f64 },
    /// Both transmitted modes are evanescent.
    PostCriticalBoth,
}

/// Ray geometry for a single incidence angle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RayGeometry {
    /// Incidence angle of the P wave in the upper layer.
    pub theta1: f64,
    /// Ray parameter sin(θ1) / Vp1.
    pub p: f64,
    /// Reflected S angle in the upper layer.
    pub thetas1: f64,
    pub transmission: Transmission,
}

impl RayGeometry {
    /// Transmitted P angle, `None` past the P critical angle.
    pub fn theta2(&self) -> Option<f64> {
        match self.transmission {
            Transmission::Propagating { theta2, .. } => Some(theta2),
            _ => None,
        }
    }

    /// Transmitted S angle, `None` past the S critical angle.
    pub fn thetas2(&self) -> Option<f64> {
        match self.transmission {
            Transmission::Propagating { thetas2, .. } => Some(thetas2),
            Transmission::PostCriticalP { thetas2 } => Some(thetas2),
            Transmission::PostCriticalBoth => None,
        }
    }

    pub fn is_post_critical(&self) -> bool {
        !matches!(self.transmission, Transmission::Propagating { .. })
    }
}

/// Critical angles (θ_crit1 for transmitted P, θ_crit2 for transmitted S).
///
/// Each is `None` when the lower-layer velocity does not exceed Vp1, in
/// which case that transmitted mode propagates at every incidence angle.
pub fn critical_angles(vp1: f64, vp2: f64, vs2: f64) -> (Option<f64>, Option<f64>) {
    let crit = |v: f64| (v > vp1).then(|| (vp1 / v).asin());
    (crit(vp2), crit(vs2))
}

/// Traces a single incidence angle.
///
/// **Context**: Every reflectivity formula needs the angles of the scattered
/// waves, and the exact solvers need to know when a transmitted mode has
/// become evanescent so they can switch to complex arithmetic.
///
/// **How it Works**: Computes the ray parameter p = sin(θ1)/Vp1 and the
/// transmitted sines p·Vp2 and p·Vs2. A sine up to 1 (within the tolerance)
/// gives a real angle; above it the mode is post-critical. Since Vs2 < Vp2 the
/// P mode always goes post-critical first, so three regimes cover every case.
pub fn trace(vp1: f64, vp2: f64, vs1: f64, vs2: f64, theta1: f64) -> RayGeometry {
    trace_with_tolerance(vp1, vp2, vs1, vs2, theta1, CRITICAL_ANGLE_TOLERANCE)
}

/// Traces every angle of `theta1` independently.
///
/// # Example
/// ```rust
/// use reflectivity::snell::snell;
///
/// let geoms = snell(3000.0, 4000.0, 1500.0, 2000.0, &[0.0, 0.5, 1.0]);
/// assert!(geoms[0].theta2().is_some());
/// assert!(geoms[2].theta2().is_none()); // beyond arcsin(3/4)
/// ```
pub fn snell(vp1: f64, vp2: f64, vs1: f64, vs2: f64, theta1: &[f64]) -> Vec<RayGeometry> {
    snell_with_settings(&Settings::default(), vp1, vp2, vs1, vs2, theta1)
}

/// [`snell`] using the critical-angle tolerance of `settings`.
pub fn snell_with_settings(
    settings: &Settings,
    vp1: f64,
    vp2: f64,
    vs1: f64,
    vs2: f64,
    theta1: &[f64],
) -> Vec<RayGeometry> {
    theta1
        .iter()
        .map(|&theta| {
            trace_with_tolerance(
                vp1,
                vp2,
                vs1,
                vs2,
                theta,
                settings.critical_angle_tolerance,
            )
        })
        .collect()
}

fn trace_with_tolerance(
    vp1: f64,
    vp2: f64,
    vs1: f64,
    vs2: f64,
    theta1: f64,
    tolerance: f64,
) -> RayGeometry {
    let p = theta1.sin() / vp1;
    let thetas1 = (p * vs1).asin();

    let sin_p = p * vp2;
    let sin_s = p * vs2;
    let transmission = if sin_p.abs() <= 1.0 + tolerance {
        Transmission::Propagating {
            theta2: clamped_asin(sin_p),
            thetas2: clamped_asin(sin_s),
        }
    } else if sin_s.abs() <= 1.0 + tolerance {
        Transmission::PostCriticalP {
            thetas2: clamped_asin(sin_s),
        }
    } else {
        Transmission::PostCriticalBoth
    };

    log::trace!("theta1 = {}: {:?}", theta1, transmission);

    RayGeometry {
        theta1,
        p,
        thetas1,
        transmission,
    }
}

fn clamped_asin(sine: f64) -> f64 {
    sine.clamp(-1.0, 1.0).asin()
}
