use ndarray::Array1;

/// Convert a sequence of angles in degrees to radians.
pub fn to_radians(degrees: &[f64]) -> Vec<f64> {
    degrees.iter().map(|d| d.to_radians()).collect()
}

/// Generate `num` evenly spaced incidence angles from `start` to `stop` degrees
/// (inclusive), in radians.
pub fn incidence_range(start: f64, stop: f64, num: usize) -> Vec<f64> {
    Array1::linspace(start, stop, num)
        .mapv(f64::to_radians)
        .to_vec()
}
