use itertools::multiunzip;
use num_complex::Complex64;
use serde::Serialize;

use crate::zoeppritz::ElasticCoefficients;

/// Per-mode coefficient curves, index-aligned with the input angles.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct ModeCurves {
    pub rpp: Vec<Complex64>,
    pub rps: Vec<Complex64>,
    pub tpp: Vec<Complex64>,
    pub tps: Vec<Complex64>,
}

impl ModeCurves {
    /// Splits a per-angle sequence of coefficients into one curve per mode.
    pub fn from_coefficients(coeffs: &[ElasticCoefficients]) -> Self {
        let (rpp, rps, tpp, tps): (Vec<_>, Vec<_>, Vec<_>, Vec<_>) =
            multiunzip(coeffs.iter().map(|c| (c.rpp, c.rps, c.tpp, c.tps)));
        Self { rpp, rps, tpp, tps }
    }

    pub fn len(&self) -> usize {
        self.rpp.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rpp.is_empty()
    }

    /// Real part of the PP reflectivity, the usual AVO curve below critical.
    pub fn rpp_real(&self) -> Vec<f64> {
        self.rpp.iter().map(|r| r.re).collect()
    }
}
