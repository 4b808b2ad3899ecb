extern crate pretty_env_logger;

use crate::{geo_chief, scenario_epoch};
use relnav::cosmic::{assert_state_eq_or_abs, ClassicalElements, EARTH_MU_KM3_S2};
use relnav::dynamics::OrbitalDynamics;
use relnav::propagators::{PropOpts, PropagationError, Propagator, RK4Fixed};
use relnav::time::{Duration, Unit};
use relnav::InertialState;
use rstest::*;

#[fixture]
fn two_body() -> Propagator<OrbitalDynamics> {
    Propagator::new::<RK4Fixed>(OrbitalDynamics::two_body(), PropOpts::default())
}

#[rstest]
fn geo_closes_after_one_period(two_body: Propagator<OrbitalDynamics>) {
    if pretty_env_logger::try_init().is_err() {
        println!("could not init env_logger");
    }

    let chief = geo_chief();
    let period_s = ClassicalElements::from_state(&chief, EARTH_MU_KM3_S2)
        .unwrap()
        .period_s(EARTH_MU_KM3_S2);

    let mut instance = two_body.with(chief);
    let end = instance.for_duration(period_s * Unit::Second).unwrap();
    assert_eq!(end.epoch, chief.epoch + period_s * Unit::Second);
    // 86164 s split in equal steps of at most 300 s
    assert_eq!(instance.latest_details().steps, 288);
    assert!(instance.latest_details().step <= 300 * Unit::Second);

    // Same position and velocity, one period later
    let mut closed = chief;
    closed.epoch = end.epoch;
    assert_state_eq_or_abs(&end, &closed, 5e-3, 1e-6, "GEO closure after one period");
    assert!(!end.eq_within(&chief, 5e-3, 1e-6));
    // Energy is conserved
    assert!(
        (end.energy_km2_s2(EARTH_MU_KM3_S2) - chief.energy_km2_s2(EARTH_MU_KM3_S2)).abs() < 1e-7
    );
}

#[rstest]
#[case(1_000.5 * Unit::Second, 4)]
#[case(-1_000.5 * Unit::Second, 4)]
#[case(300 * Unit::Second, 1)]
#[case(17 * Unit::Second, 1)]
#[case(Duration::ZERO, 0)]
fn lands_exactly_on_epoch(
    two_body: Propagator<OrbitalDynamics>,
    #[case] span: Duration,
    #[case] expected_steps: usize,
) {
    let chief = geo_chief();
    let target = chief.epoch + span;
    let mut instance = two_body.with(chief);
    let end = instance.step_to_epoch(target).unwrap();
    assert_eq!(end.epoch, target);
    assert_eq!(instance.state.epoch, target);
    assert_eq!(instance.latest_details().steps, expected_steps);
}

#[rstest]
fn backward_undoes_forward(two_body: Propagator<OrbitalDynamics>) {
    let chief = geo_chief();
    let mut instance = two_body.with(chief);
    instance.for_duration(1_000.5 * Unit::Second).unwrap();
    let back = instance.step_to_epoch(chief.epoch).unwrap();
    assert_eq!(back.epoch, chief.epoch);
    assert_state_eq_or_abs(&back, &chief, 1e-6, 1e-9, "forward then backward");
}

#[rstest]
fn step_size_is_preserved(two_body: Propagator<OrbitalDynamics>) {
    let chief = geo_chief();
    let mut instance = two_body.with(chief);
    instance.set_step(60 * Unit::Second);
    instance.for_duration(1_000.5 * Unit::Second).unwrap();
    let before = instance.state.epoch;
    let after = instance.step().unwrap();
    assert_eq!(after.epoch - before, 60 * Unit::Second);
    assert_eq!(instance.latest_details().steps, 1);
}

#[test]
fn leo_energy_conservation() {
    let epoch = scenario_epoch();
    let leo = ClassicalElements::new(
        7_000.0,
        0.01,
        51.6_f64.to_radians(),
        30.0_f64.to_radians(),
        45.0_f64.to_radians(),
        10.0_f64.to_radians(),
    )
    .to_state(epoch, EARTH_MU_KM3_S2)
    .unwrap();

    let prop = Propagator::rk4(
        OrbitalDynamics::two_body(),
        PropOpts::with_fixed_step_s(30.0),
    );
    let end = prop.with(leo).for_duration(6 * Unit::Hour).unwrap();
    assert_eq!(end.epoch, epoch + 6 * Unit::Hour);
    let energy_drift =
        (end.energy_km2_s2(EARTH_MU_KM3_S2) - leo.energy_km2_s2(EARTH_MU_KM3_S2)).abs();
    assert!(energy_drift < 5e-6, "energy drift {energy_drift}");
    assert!((end.hmag() - leo.hmag()).abs() < 5e-3);
}

#[test]
fn invalid_options() {
    let mut opts = PropOpts::default();
    opts.set_max_step(Duration::ZERO);
    let prop = Propagator::rk4(OrbitalDynamics::two_body(), opts);
    let chief = geo_chief();
    let rslt = prop.with(chief).for_duration(1 * Unit::Hour);
    assert!(matches!(rslt, Err(PropagationError::PropConfigError { .. })));
}

#[test]
fn degenerate_state() {
    let prop = Propagator::default(OrbitalDynamics::two_body());
    let at_center = InertialState::cartesian(0.0, 0.0, 0.0, 1.0, 0.0, 0.0, scenario_epoch());
    assert!(matches!(
        prop.with(at_center).for_duration(1 * Unit::Minute),
        Err(PropagationError::Dynamics { .. })
    ));
}
