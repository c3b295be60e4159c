/// Default relative conditioning below which a boundary-condition matrix is singular.
pub const SINGULAR_TOLERANCE: f64 = 1e-10;
/// Transmitted sines this far above 1 still count as grazing transmission.
pub const CRITICAL_ANGLE_TOLERANCE: f64 = 1e-12;
/// Below this sin²θ the Daley-Hron polarization uses its normal-incidence limit.
pub const SMALL_ANGLE_SIN2: f64 = 1e-12;
