//! Elastic-wave reflectivity at a planar interface between two layers.
//!
//! Given the elastic properties of an upper and a lower layer and a sequence
//! of P-wave incidence angles (radians), this crate evaluates how much of the
//! incident P wave is reflected as P, converted to S, and transmitted.
//!
//! The crate provides:
//! - Snell's-law ray geometry with explicit post-critical regimes ([`snell`])
//! - Weak-contrast isotropic approximations: Shuey, Aki-Richards, Bortfeld ([`avo`])
//! - The exact isotropic Zoeppritz solution ([`zoeppritz`])
//! - Thomsen parameter / stiffness tensor conversion ([`thomsen`])
//! - Weak-anisotropy Ruger approximations for VTI and HTI media ([`ruger`])
//! - Exact anisotropic solutions: Daley-Hron for VTI ([`vti`]) and
//!   Schoenberg-Protazio for HTI ([`hti`])
//! - Elastic and extended elastic impedance ([`impedance`])
//!
//! Every operation takes layer properties as scalars and returns one value
//! per incidence angle. Nothing is cached between calls.

pub mod acoustic;
pub mod angles;
pub mod avo;
pub mod config;
pub mod energy;
pub mod error;
pub mod hti;
pub mod impedance;
pub mod layer;
pub mod linalg;
pub mod result;
pub mod ruger;
pub mod settings;
pub mod snell;
pub mod thomsen;
pub mod vti;
pub mod zoeppritz;

pub use error::{ReflectivityError, Result};
pub use settings::Settings;
