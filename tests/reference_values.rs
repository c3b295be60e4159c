use std::{fs::File, io::BufReader, path::Path};

use num_complex::Complex64;
use reflectivity::{
    angles, avo, hti,
    impedance::{self, ImpedanceReference},
    ruger, thomsen, vti, zoeppritz,
};
use serde::Deserialize;

// Reference values agree to round-off; allow for different operation order
const TOL: f64 = 1e-9;

#[derive(Debug, Deserialize)]
struct Layers {
    vp1: f64,
    vs1: f64,
    rho1: f64,
    vp2: f64,
    vs2: f64,
    rho2: f64,
}

#[derive(Debug, Deserialize)]
struct Coefficients {
    rpp: [f64; 2],
    rps: [f64; 2],
    tpp: [f64; 2],
    tps: [f64; 2],
}

#[derive(Debug, Deserialize)]
struct Thomsen {
    epsilon: f64,
    delta: f64,
    gamma: f64,
}

#[derive(Debug, Deserialize)]
struct Anisotropy {
    upper: Thomsen,
    lower: Thomsen,
}

#[derive(Debug, Deserialize)]
struct Stiffness {
    c11: f64,
    c13: f64,
    c33: f64,
    c55: f64,
    c66: f64,
}

#[derive(Debug, Deserialize)]
struct Reference {
    layers: Layers,
    angles_deg: Vec<f64>,
    shuey: Vec<f64>,
    aki_richards: Vec<f64>,
    bortfeld: Vec<f64>,
    zoeppritz_angles_deg: Vec<f64>,
    zoeppritz: Vec<Coefficients>,
    anisotropy: Anisotropy,
    ruger_vti: Vec<f64>,
    ruger_hti_azimuth_deg: f64,
    ruger_hti: Vec<f64>,
    stiffness_upper: Stiffness,
    stiffness_lower: Stiffness,
    exact_vti: Vec<[f64; 2]>,
    exact_hti: Vec<[f64; 2]>,
    elastic_impedance: Vec<f64>,
    extended_elastic_impedance_chi_deg: Vec<f64>,
    extended_elastic_impedance: Vec<f64>,
    extended_reference: ImpedanceReference,
}

fn load_reference() -> Result<Reference, Box<dyn std::error::Error>> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/reference_values.json");
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

fn complex(value: [f64; 2]) -> Complex64 {
    Complex64::new(value[0], value[1])
}

fn compare_real(name: &str, result: &[f64], reference: &[f64]) {
    assert_eq!(result.len(), reference.len(), "{}: length mismatch", name);
    for (i, (a, b)) in result.iter().zip(reference.iter()).enumerate() {
        assert!(
            (a - b).abs() <= TOL * b.abs().max(1.0),
            "{}[{}]: {} vs reference {}",
            name,
            i,
            a,
            b
        );
    }
}

fn compare_complex(name: &str, result: &[Complex64], reference: &[[f64; 2]]) {
    assert_eq!(result.len(), reference.len(), "{}: length mismatch", name);
    for (i, (a, b)) in result.iter().zip(reference.iter()).enumerate() {
        let b = complex(*b);
        assert!(
            (a - b).norm() < TOL,
            "{}[{}]: {} vs reference {}",
            name,
            i,
            a,
            b
        );
    }
}

#[test]
fn isotropic_approximations() {
    let r = load_reference().unwrap();
    let l = &r.layers;
    let theta = angles::to_radians(&r.angles_deg);

    let shuey = avo::shuey(l.vp1, l.vs1, l.rho1, l.vp2, l.vs2, l.rho2, &theta).unwrap();
    compare_real("shuey", &shuey, &r.shuey);
    let aki = avo::aki_richards(l.vp1, l.vs1, l.rho1, l.vp2, l.vs2, l.rho2, &theta).unwrap();
    compare_real("aki_richards", &aki, &r.aki_richards);
    let bortfeld = avo::bortfeld(l.vp1, l.vs1, l.rho1, l.vp2, l.vs2, l.rho2, &theta).unwrap();
    compare_real("bortfeld", &bortfeld, &r.bortfeld);
}

#[test]
fn zoeppritz_coefficients() {
    let r = load_reference().unwrap();
    let l = &r.layers;
    let theta = angles::to_radians(&r.zoeppritz_angles_deg);

    let coeffs =
        zoeppritz::zoeppritz(l.vp1, l.vs1, l.rho1, l.vp2, l.vs2, l.rho2, &theta).unwrap();
    assert_eq!(coeffs.len(), r.zoeppritz.len());
    for (i, (c, reference)) in coeffs.iter().zip(r.zoeppritz.iter()).enumerate() {
        for (mode, value, expected) in [
            ("rpp", c.rpp, reference.rpp),
            ("rps", c.rps, reference.rps),
            ("tpp", c.tpp, reference.tpp),
            ("tps", c.tps, reference.tps),
        ] {
            assert!(
                (value - complex(expected)).norm() < TOL,
                "{}[{}]: {} vs reference {:?}",
                mode,
                i,
                value,
                expected
            );
        }
    }
}

#[test]
fn stiffness_from_thomsen() {
    let r = load_reference().unwrap();
    let l = &r.layers;
    for (thomsen_params, layer, expected) in [
        (&r.anisotropy.upper, (l.vp1, l.vs1, l.rho1), &r.stiffness_upper),
        (&r.anisotropy.lower, (l.vp2, l.vs2, l.rho2), &r.stiffness_lower),
    ] {
        let (vp, vs, rho) = layer;
        let c = thomsen::cij(
            thomsen_params.epsilon,
            thomsen_params.delta,
            thomsen_params.gamma,
            rho,
            vp,
            vs,
        )
        .unwrap();
        compare_real(
            "cij",
            &[c.c11(), c.c13(), c.c33(), c.c55(), c.c66()],
            &[expected.c11, expected.c13, expected.c33, expected.c55, expected.c66],
        );
    }
}

#[test]
fn ruger_approximations() {
    let r = load_reference().unwrap();
    let l = &r.layers;
    let (up, lo) = (&r.anisotropy.upper, &r.anisotropy.lower);
    let theta = angles::to_radians(&r.angles_deg);

    let vti = ruger::ruger_vti(
        l.vp1, l.vs1, l.rho1, up.epsilon, up.delta, l.vp2, l.vs2, l.rho2, lo.epsilon, lo.delta,
        &theta,
    )
    .unwrap();
    compare_real("ruger_vti", &vti, &r.ruger_vti);

    // the reference treats each layer's δ as its δᵥ
    let hti = ruger::ruger_hti(
        l.vp1,
        l.vs1,
        l.rho1,
        up.epsilon,
        up.delta,
        up.gamma,
        l.vp2,
        l.vs2,
        l.rho2,
        lo.epsilon,
        lo.delta,
        lo.gamma,
        &theta,
        r.ruger_hti_azimuth_deg.to_radians(),
    )
    .unwrap();
    compare_real("ruger_hti", &hti, &r.ruger_hti);
}

#[test]
fn exact_anisotropic_solvers() {
    let r = load_reference().unwrap();
    let l = &r.layers;
    let (up, lo) = (&r.anisotropy.upper, &r.anisotropy.lower);
    let (c1, c2) = (&r.stiffness_upper, &r.stiffness_lower);
    let theta = angles::to_radians(&r.angles_deg);

    let rpp = vti::exact_vti(
        l.vp1, l.vp2, l.vs1, l.vs2, l.rho1, l.rho2, &theta, c1.c11, c1.c13, c1.c33, c1.c55,
        c2.c11, c2.c13, c2.c33, c2.c55,
    )
    .unwrap();
    compare_complex("exact_vti", &rpp, &r.exact_vti);

    let rpp = vti::exact_vti_thomsen(
        l.vp1, l.vs1, l.rho1, up.epsilon, up.delta, l.vp2, l.vs2, l.rho2, lo.epsilon, lo.delta,
        &theta,
    )
    .unwrap();
    compare_complex("exact_vti_thomsen", &rpp, &r.exact_vti);

    let rpp = hti::exact_hti(
        l.vp1, l.vs1, l.rho1, up.epsilon, up.delta, up.gamma, l.vp2, l.vs2, l.rho2, lo.epsilon,
        lo.delta, lo.gamma, &theta,
    )
    .unwrap();
    compare_complex("exact_hti", &rpp, &r.exact_hti);
}

#[test]
fn impedance_transforms() {
    let r = load_reference().unwrap();
    let l = &r.layers;
    let theta = angles::to_radians(&r.angles_deg);

    let ei = impedance::elastic_impedance(l.vp1, l.vs1, l.rho1, &theta).unwrap();
    compare_real("elastic_impedance", &ei, &r.elastic_impedance);

    let chi = angles::to_radians(&r.extended_elastic_impedance_chi_deg);
    let eei = impedance::extended_elastic_impedance(
        l.vp1,
        l.vs1,
        l.rho1,
        &chi,
        &r.extended_reference,
    )
    .unwrap();
    compare_real("extended_elastic_impedance", &eei, &r.extended_elastic_impedance);
}
