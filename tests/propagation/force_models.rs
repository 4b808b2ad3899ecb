extern crate pretty_env_logger;

use crate::scenario_epoch;
use relnav::cosmic::ephemerides::sun_position;
use relnav::cosmic::{ClassicalElements, EarthOrientation, AU, EARTH_MU_KM3_S2};
use relnav::dynamics::{
    AccelModel, Dynamics, ForceModelConfig, Harmonics, OrbitalDynamics, SolarPressure, ThirdBody,
};
use relnav::io::gravity::GeopotentialModel;
use relnav::propagators::{PropOpts, Propagator};
use relnav::time::Unit;
use relnav::utils::between_pm_180;
use relnav::InertialState;
use rstest::*;
use std::sync::Arc;

#[fixture]
fn leo() -> InertialState {
    ClassicalElements::new(
        7_000.0,
        0.001,
        51.6_f64.to_radians(),
        30.0_f64.to_radians(),
        45.0_f64.to_radians(),
        10.0_f64.to_radians(),
    )
    .to_state(scenario_epoch(), EARTH_MU_KM3_S2)
    .unwrap()
}

#[fixture]
fn orientation() -> Arc<EarthOrientation> {
    Arc::new(EarthOrientation::without_eop())
}

#[rstest]
fn j2_nodal_regression(leo: InertialState, orientation: Arc<EarthOrientation>) {
    if pretty_env_logger::try_init().is_err() {
        println!("could not init env_logger");
    }

    let cfg = ForceModelConfig::builder()
        .luni_solar(false)
        .geopotential_degree(2)
        .build();
    let dynamics =
        OrbitalDynamics::from_config(&cfg, Arc::new(GeopotentialModel::j2_only()), orientation)
            .unwrap();
    assert_eq!(dynamics.accel_models.len(), 1);

    let prop = Propagator::rk4(dynamics, PropOpts::with_fixed_step_s(30.0));
    let end = prop.with(leo).for_duration(6 * Unit::Hour).unwrap();

    let raan_start = ClassicalElements::from_state(&leo, EARTH_MU_KM3_S2)
        .unwrap()
        .raan_rad;
    let raan_end = ClassicalElements::from_state(&end, EARTH_MU_KM3_S2)
        .unwrap()
        .raan_rad;
    let drift_deg = between_pm_180((raan_end - raan_start).to_degrees());
    // About -4.5 deg/day for this orbit
    assert!((-1.3..=-0.95).contains(&drift_deg), "RAAN drift {drift_deg} deg");
}

#[rstest]
fn full_force_model(leo: InertialState, orientation: Arc<EarthOrientation>) {
    let cfg = ForceModelConfig::builder().srp_scalar_m2_kg(0.02).build();
    let dynamics = OrbitalDynamics::from_config(
        &cfg,
        Arc::new(GeopotentialModel::egm2008_4x4()),
        orientation,
    )
    .unwrap();
    // Moon, Sun, SRP, then the geopotential
    assert_eq!(dynamics.accel_models.len(), 4);
    println!("{dynamics}");

    let prop = Propagator::rk4(dynamics, PropOpts::with_fixed_step_s(30.0));
    let perturbed = prop.with(leo).for_duration(1 * Unit::Hour).unwrap();

    let two_body = Propagator::rk4(
        OrbitalDynamics::two_body(),
        PropOpts::with_fixed_step_s(30.0),
    );
    let keplerian = two_body.with(leo).for_duration(1 * Unit::Hour).unwrap();

    let delta_km = (perturbed.radius_km - keplerian.radius_km).norm();
    assert!(
        (0.1..100.0).contains(&delta_km),
        "perturbations moved the state by {delta_km} km"
    );
    assert!((6_900.0..7_100.0).contains(&perturbed.rmag_km()));
}

#[rstest]
fn perturbation_magnitudes(leo: InertialState, orientation: Arc<EarthOrientation>) {
    let j2 = Harmonics::new(Arc::new(GeopotentialModel::j2_only()), orientation, 2);
    let point_mass = EARTH_MU_KM3_S2 / leo.rmag_km().powi(2);
    let ratio = j2.eom(&leo).unwrap().norm() / point_mass;
    // J2 is about a thousandth of the point mass in LEO
    assert!((1e-4..3e-3).contains(&ratio), "J2 ratio {ratio}");

    let moon = ThirdBody::moon().eom(&leo).unwrap().norm();
    let sun = ThirdBody::sun().eom(&leo).unwrap().norm();
    assert!((1e-10..1e-8).contains(&moon), "Moon {moon} km/s^2");
    assert!((1e-10..1e-8).contains(&sun), "Sun {sun} km/s^2");

    let srp = SolarPressure::new(0.02).eom(&leo).unwrap().norm();
    let sun_dist_au = (sun_position(leo.epoch) - leo.radius_km).norm() / AU;
    let expected = 4.56e-6 * 0.02 * 1e-3 / sun_dist_au.powi(2);
    assert!((srp / expected - 1.0).abs() < 1e-9, "SRP {srp} km/s^2");
}

#[test]
fn two_body_equations_of_motion() {
    let state = InertialState::cartesian(7_000.0, 0.0, 0.0, 0.0, 7.5, 0.0, scenario_epoch());
    let deriv = OrbitalDynamics::two_body().eom(&state).unwrap();
    assert_eq!(deriv[1], 7.5);
    assert!((deriv[3] + EARTH_MU_KM3_S2 / 7_000.0_f64.powi(2)).abs() < 1e-15);
    assert_eq!(deriv[4], 0.0);
}

#[test]
fn invalid_force_model() {
    let cfg = ForceModelConfig::builder().srp_scalar_m2_kg(-1.0).build();
    assert!(OrbitalDynamics::from_config(
        &cfg,
        Arc::new(GeopotentialModel::j2_only()),
        Arc::new(EarthOrientation::without_eop())
    )
    .is_err());
}
