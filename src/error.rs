//! Error types for reflectivity computations.

use thiserror::Error;

/// Errors returned by the reflectivity operations.
///
/// Post-critical ray geometry is not an error: it is reported through
/// [`crate::snell::Transmission`] and propagates as NaN through the
/// approximations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReflectivityError {
    /// Invalid physical input or a parameter conversion outside its domain.
    #[error("{formula}: {reason}")]
    Domain {
        formula: &'static str,
        reason: String,
    },

    /// A per-angle boundary-condition system could not be inverted.
    #[error(
        "{formula}: singular boundary-condition matrix at angle index {index} \
         (conditioning {conditioning:e} below tolerance {tolerance:e})"
    )]
    SingularMatrix {
        formula: &'static str,
        index: usize,
        conditioning: f64,
        tolerance: f64,
    },
}

impl ReflectivityError {
    /// Create a domain error.
    pub fn domain(formula: &'static str, reason: impl Into<String>) -> Self {
        Self::Domain {
            formula,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReflectivityError>;
