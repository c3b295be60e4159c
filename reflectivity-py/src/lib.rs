use num_complex::Complex64;
use pyo3::exceptions::{PyArithmeticError, PyValueError};
use pyo3::prelude::*;
use reflectivity::{
    acoustic, angles, avo, energy, hti, impedance, result::ModeCurves, ruger, vti,
    ReflectivityError,
};

fn to_py_err(err: ReflectivityError) -> PyErr {
    match err {
        ReflectivityError::Domain { .. } => PyValueError::new_err(err.to_string()),
        ReflectivityError::SingularMatrix { .. } => PyArithmeticError::new_err(err.to_string()),
    }
}

/// Ray geometry per angle as (p, thetas1, theta2, thetas2); undefined
/// transmitted angles are None.
#[pyfunction]
fn snell(
    vp1: f64,
    vp2: f64,
    vs1: f64,
    vs2: f64,
    theta1: Vec<f64>,
) -> Vec<(f64, f64, Option<f64>, Option<f64>)> {
    reflectivity::snell::snell(vp1, vp2, vs1, vs2, &theta1)
        .iter()
        .map(|g| (g.p, g.thetas1, g.theta2(), g.thetas2()))
        .collect()
}

#[pyfunction]
fn critical_angles(vp1: f64, vp2: f64, vs2: f64) -> (Option<f64>, Option<f64>) {
    reflectivity::snell::critical_angles(vp1, vp2, vs2)
}

#[pyfunction]
fn normal_incidence(vp1: f64, rho1: f64, vp2: f64, rho2: f64) -> PyResult<(f64, f64)> {
    acoustic::normal_incidence(vp1, rho1, vp2, rho2).map_err(to_py_err)
}

#[pyfunction]
fn incidence_range(start: f64, stop: f64, num: usize) -> Vec<f64> {
    angles::incidence_range(start, stop, num)
}

#[pyfunction]
fn shuey(
    vp1: f64,
    vs1: f64,
    rho1: f64,
    vp2: f64,
    vs2: f64,
    rho2: f64,
    theta1: Vec<f64>,
) -> PyResult<Vec<f64>> {
    avo::shuey(vp1, vs1, rho1, vp2, vs2, rho2, &theta1).map_err(to_py_err)
}

/// Shuey intercept, gradient and curvature.
#[pyfunction]
fn shuey_terms(
    vp1: f64,
    vs1: f64,
    rho1: f64,
    vp2: f64,
    vs2: f64,
    rho2: f64,
) -> PyResult<(f64, f64, f64)> {
    let terms = avo::shuey_terms(vp1, vs1, rho1, vp2, vs2, rho2).map_err(to_py_err)?;
    Ok((terms.intercept, terms.gradient, terms.curvature))
}

#[pyfunction]
fn aki_richards(
    vp1: f64,
    vs1: f64,
    rho1: f64,
    vp2: f64,
    vs2: f64,
    rho2: f64,
    theta1: Vec<f64>,
) -> PyResult<Vec<f64>> {
    avo::aki_richards(vp1, vs1, rho1, vp2, vs2, rho2, &theta1).map_err(to_py_err)
}

#[pyfunction]
fn bortfeld(
    vp1: f64,
    vs1: f64,
    rho1: f64,
    vp2: f64,
    vs2: f64,
    rho2: f64,
    theta1: Vec<f64>,
) -> PyResult<Vec<f64>> {
    avo::bortfeld(vp1, vs1, rho1, vp2, vs2, rho2, &theta1).map_err(to_py_err)
}

/// Exact (Rpp, Rps, Tpp, Tps) curves.
#[pyfunction]
#[allow(clippy::type_complexity)]
fn zoeppritz(
    vp1: f64,
    vs1: f64,
    rho1: f64,
    vp2: f64,
    vs2: f64,
    rho2: f64,
    theta1: Vec<f64>,
) -> PyResult<(Vec<Complex64>, Vec<Complex64>, Vec<Complex64>, Vec<Complex64>)> {
    let coeffs = reflectivity::zoeppritz::zoeppritz(vp1, vs1, rho1, vp2, vs2, rho2, &theta1)
        .map_err(to_py_err)?;
    let curves = ModeCurves::from_coefficients(&coeffs);
    Ok((curves.rpp, curves.rps, curves.tpp, curves.tps))
}

/// Energy shares (reflected P, reflected S, transmitted P, transmitted S) per angle.
#[pyfunction]
fn energy_partition(
    vp1: f64,
    vs1: f64,
    rho1: f64,
    vp2: f64,
    vs2: f64,
    rho2: f64,
    theta1: Vec<f64>,
) -> PyResult<Vec<(f64, f64, f64, f64)>> {
    let parts = energy::energy_partition(vp1, vs1, rho1, vp2, vs2, rho2, &theta1)
        .map_err(to_py_err)?;
    Ok(parts
        .iter()
        .map(|e| (e.reflected_p, e.reflected_s, e.transmitted_p, e.transmitted_s))
        .collect())
}

/// (epsilon, delta, gamma, delta_v) of a VTI stiffness tensor.
#[pyfunction]
fn thomsen(c11: f64, c13: f64, c33: f64, c55: f64, c66: f64) -> PyResult<(f64, f64, f64, f64)> {
    let tensor = reflectivity::thomsen::StiffnessTensor::from_components(c11, c13, c33, c55, c66);
    let p = reflectivity::thomsen::thomsen(&tensor).map_err(to_py_err)?;
    Ok((p.epsilon, p.delta, p.gamma, p.delta_v))
}

/// (C11, C13, C33, C55, C66) from Thomsen parameters.
#[pyfunction]
fn cij(
    epsilon: f64,
    delta: f64,
    gamma: f64,
    rho: f64,
    vp: f64,
    vs: f64,
) -> PyResult<(f64, f64, f64, f64, f64)> {
    let c = reflectivity::thomsen::cij(epsilon, delta, gamma, rho, vp, vs).map_err(to_py_err)?;
    Ok((c.c11(), c.c13(), c.c33(), c.c55(), c.c66()))
}

#[pyfunction]
#[allow(clippy::too_many_arguments)]
fn ruger_vti(
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
    theta1: Vec<f64>,
) -> PyResult<Vec<f64>> {
    ruger::ruger_vti(vp1, vs1, rho1, e1, d1, vp2, vs2, rho2, e2, d2, &theta1).map_err(to_py_err)
}

#[pyfunction]
#[allow(clippy::too_many_arguments)]
fn ruger_hti(
    vp1: f64,
    vs1: f64,
    rho1: f64,
    e1: f64,
    dv1: f64,
    y1: f64,
    vp2: f64,
    vs2: f64,
    rho2: f64,
    e2: f64,
    dv2: f64,
    y2: f64,
    theta1: Vec<f64>,
    az: f64,
) -> PyResult<Vec<f64>> {
    ruger::ruger_hti(
        vp1, vs1, rho1, e1, dv1, y1, vp2, vs2, rho2, e2, dv2, y2, &theta1, az,
    )
    .map_err(to_py_err)
}

#[pyfunction]
#[allow(clippy::too_many_arguments)]
fn exact_vti(
    v1: f64,
    v2: f64,
    v3: f64,
    v4: f64,
    rho1: f64,
    rho2: f64,
    theta1: Vec<f64>,
    c1_11: f64,
    c1_13: f64,
    c1_33: f64,
    c1_55: f64,
    c2_11: f64,
    c2_13: f64,
    c2_33: f64,
    c2_55: f64,
) -> PyResult<Vec<Complex64>> {
    vti::exact_vti(
        v1, v2, v3, v4, rho1, rho2, &theta1, c1_11, c1_13, c1_33, c1_55, c2_11, c2_13, c2_33,
        c2_55,
    )
    .map_err(to_py_err)
}

#[pyfunction]
#[allow(clippy::too_many_arguments)]
fn exact_vti_thomsen(
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
    theta1: Vec<f64>,
) -> PyResult<Vec<Complex64>> {
    vti::exact_vti_thomsen(vp1, vs1, rho1, e1, d1, vp2, vs2, rho2, e2, d2, &theta1)
        .map_err(to_py_err)
}

#[pyfunction]
#[allow(clippy::too_many_arguments)]
fn exact_hti(
    vp1: f64,
    vs1: f64,
    rho1: f64,
    e1: f64,
    d1: f64,
    y1: f64,
    vp2: f64,
    vs2: f64,
    rho2: f64,
    e2: f64,
    d2: f64,
    y2: f64,
    theta1: Vec<f64>,
) -> PyResult<Vec<Complex64>> {
    hti::exact_hti(
        vp1, vs1, rho1, e1, d1, y1, vp2, vs2, rho2, e2, d2, y2, &theta1,
    )
    .map_err(to_py_err)
}

#[pyfunction]
fn elastic_impedance(vp: f64, vs: f64, rho: f64, theta: Vec<f64>) -> PyResult<Vec<f64>> {
    impedance::elastic_impedance(vp, vs, rho, &theta).map_err(to_py_err)
}

#[pyfunction]
#[pyo3(signature = (vp, vs, rho, chi, vp0=1.0, vs0=1.0, rho0=1.0))]
#[allow(clippy::too_many_arguments)]
fn extended_elastic_impedance(
    vp: f64,
    vs: f64,
    rho: f64,
    chi: Vec<f64>,
    vp0: f64,
    vs0: f64,
    rho0: f64,
) -> PyResult<Vec<f64>> {
    let reference = impedance::ImpedanceReference { vp0, vs0, rho0 };
    impedance::extended_elastic_impedance(vp, vs, rho, &chi, &reference).map_err(to_py_err)
}

/// Elastic-wave reflectivity at a planar interface.
#[pymodule]
fn reflectivity_py(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(snell, m)?)?;
    m.add_function(wrap_pyfunction!(critical_angles, m)?)?;
    m.add_function(wrap_pyfunction!(normal_incidence, m)?)?;
    m.add_function(wrap_pyfunction!(incidence_range, m)?)?;
    m.add_function(wrap_pyfunction!(shuey, m)?)?;
    m.add_function(wrap_pyfunction!(shuey_terms, m)?)?;
    m.add_function(wrap_pyfunction!(aki_richards, m)?)?;
    m.add_function(wrap_pyfunction!(bortfeld, m)?)?;
    m.add_function(wrap_pyfunction!(zoeppritz, m)?)?;
    m.add_function(wrap_pyfunction!(energy_partition, m)?)?;
    m.add_function(wrap_pyfunction!(thomsen, m)?)?;
    m.add_function(wrap_pyfunction!(cij, m)?)?;
    m.add_function(wrap_pyfunction!(ruger_vti, m)?)?;
    m.add_function(wrap_pyfunction!(ruger_hti, m)?)?;
    m.add_function(wrap_pyfunction!(exact_vti, m)?)?;
    m.add_function(wrap_pyfunction!(exact_vti_thomsen, m)?)?;
    m.add_function(wrap_pyfunction!(exact_hti, m)?)?;
    m.add_function(wrap_pyfunction!(elastic_impedance, m)?)?;
    m.add_function(wrap_pyfunction!(extended_elastic_impedance, m)?)?;
    Ok(())
}
