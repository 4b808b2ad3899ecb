extern crate pretty_env_logger;

use crate::{geo_chief, geo_deputy_hill};
use relnav::cosmic::{to_hill, to_inertial, EarthOrientation, EARTH_MU_KM3_S2};
use relnav::dynamics::{ForceModelConfig, OrbitalDynamics};
use relnav::io::gravity::GeopotentialModel;
use relnav::linalg::{Matrix6, Vector3};
use relnav::propagators::{HillPropagator, Propagator};
use relnav::time::Unit;
use relnav::HillState;
use std::sync::Arc;

/// Propagates the chief and the deputy with these dynamics, and the Hill state with the CW model, sampling
/// every hour for five days. At each sample, the radial difference stays within 1% of the size of the relative
/// ellipse, and the in-track difference within 1% per elapsed day (it grows secularly with the second order
/// terms the linear model ignores).
fn cw_tracks_nonlinear_relative_motion(dynamics: OrbitalDynamics) {
    let chief = geo_chief();
    let deputy = to_inertial(&geo_deputy_hill(), &chief).unwrap();
    // In-track extent of the relative ellipse
    let size_km = 2.0 * geo_deputy_hill().radius_km.norm();

    let prop = Propagator::default(dynamics);
    let mut chief_prop = prop.with(chief);
    let mut deputy_prop = prop.with(deputy);
    let mut cw = HillPropagator::from_inertial(&chief, &deputy, EARTH_MU_KM3_S2).unwrap();

    for hour in 1..=120 {
        let chief_now = chief_prop.for_duration(1 * Unit::Hour).unwrap();
        let deputy_now = deputy_prop.for_duration(1 * Unit::Hour).unwrap();
        let nonlinear = to_hill(&chief_now, &deputy_now).unwrap();
        let linear = cw.step_by_seconds(3_600.0);

        let days = hour as f64 / 24.0;
        let radial_err = (nonlinear.radius_km.x - linear.radius_km.x).abs() / size_km;
        let in_track_err = (nonlinear.radius_km.y - linear.radius_km.y).abs() / size_km;
        assert!(
            radial_err < 0.01,
            "hour {hour}: radial error {radial_err:.3e}\nnonlinear: {nonlinear}\nlinear:    {linear}"
        );
        assert!(
            in_track_err < 0.01 * days.max(1.0),
            "hour {hour}: in-track error {in_track_err:.3e}\nnonlinear: {nonlinear}\nlinear:    {linear}"
        );
    }
    assert_eq!(chief_prop.state.epoch, chief.epoch + 5 * Unit::Day);
}

#[test]
fn cw_matches_two_body_relative_motion() {
    if pretty_env_logger::try_init().is_err() {
        println!("could not init env_logger");
    }
    cw_tracks_nonlinear_relative_motion(OrbitalDynamics::two_body());
}

#[test]
fn cw_matches_perturbed_relative_motion() {
    if pretty_env_logger::try_init().is_err() {
        println!("could not init env_logger");
    }
    let dynamics = OrbitalDynamics::from_config(
        &ForceModelConfig::default(),
        Arc::new(GeopotentialModel::egm2008_4x4()),
        Arc::new(EarthOrientation::without_eop()),
    )
    .unwrap();
    // Moon, Sun, then the geopotential
    assert_eq!(dynamics.accel_models.len(), 3);
    cw_tracks_nonlinear_relative_motion(dynamics);
}

#[test]
fn cw_steps_compose() {
    let mut by_steps = HillPropagator::new(geo_deputy_hill(), 42_164.0, EARTH_MU_KM3_S2);
    let mut at_once = by_steps;
    by_steps.step_size = 15 * Unit::Minute;
    for _ in 0..96 {
        by_steps.step();
    }
    at_once.step_by_seconds(86_400.0);
    assert!((by_steps.state.to_vector() - at_once.state.to_vector()).norm() < 1e-9);
}

#[test]
fn cw_natural_motion_ellipse() {
    // A deputy with no secular drift (y_dot = -2 n x) stays on a closed ellipse over one period
    let mut cw = HillPropagator::new(HillState::default(), 42_164.0, EARTH_MU_KM3_S2);
    let n = cw.mean_motion();
    let x0 = 1.0;
    cw.state = HillState::new(Vector3::new(x0, 0.0, 0.0), Vector3::new(0.0, -2.0 * n * x0, 0.0));
    let start = cw.state;
    let end = cw.step_by_seconds(std::f64::consts::TAU / n);
    assert!((end.to_vector() - start.to_vector()).norm() < 1e-9);
}

#[test]
fn cw_inverse() {
    let cw = HillPropagator::new(geo_deputy_hill(), 42_164.0, EARTH_MU_KM3_S2);
    let stm = cw.system_matrix(3_600.0);
    let inv = cw.system_matrix(-3_600.0);
    assert!((stm * inv - Matrix6::identity()).abs().max() < 1e-9);
}
