use crate::geo_chief;
use relnav::cosmic::STD_GRAVITY;
use relnav::dynamics::{DynamicsError, FiniteBurn, OrbitalDynamics};
use relnav::linalg::Vector3;
use relnav::propagators::{PropOpts, PropagationError, Propagator};
use relnav::time::{Duration, Unit};
use rstest::*;

#[fixture]
fn prop() -> Propagator<OrbitalDynamics> {
    Propagator::rk4(
        OrbitalDynamics::two_body(),
        PropOpts::with_fixed_step(1 * Unit::Minute),
    )
}

#[fixture]
fn burn() -> FiniteBurn {
    // 147 N engine on a 500 kg spacecraft
    FiniteBurn::new(Vector3::new(0.0, 2.0, 0.0), 0.05, 500.0, 300.0).unwrap()
}

#[rstest]
fn maneuver_imparts_rocket_equation_delta_v(prop: Propagator<OrbitalDynamics>, burn: FiniteBurn) {
    let chief = geo_chief();
    let duration = 2 * Unit::Minute;

    let coast = prop.with(chief).for_duration(duration).unwrap();
    let mut instance = prop.with(chief);
    let thrust = instance.maneuver(burn, duration).unwrap();
    assert_eq!(thrust.epoch, coast.epoch);

    // Each of the two one minute steps burns from the initial mass
    let expected_km_s = 2.0 * 300.0 * STD_GRAVITY * 1e-3 * (500.0_f64 / 497.0).ln();
    assert!((2.0 * burn.delta_v_km_s(60.0).unwrap() - expected_km_s).abs() < 1e-12);

    let achieved = thrust.velocity_km_s - coast.velocity_km_s;
    assert!(
        (achieved.norm() - expected_km_s).abs() < 1e-5,
        "achieved {} km/s, expected {expected_km_s} km/s",
        achieved.norm()
    );
    // Along the thrust direction
    assert!(achieved.normalize().dot(&Vector3::y()) > 0.9999);

    // Once the burn is over, the instance coasts again
    let coast_after = prop.with(thrust).for_duration(10 * Unit::Minute).unwrap();
    let resumed = instance.for_duration(10 * Unit::Minute).unwrap();
    assert!((coast_after.to_vector() - resumed.to_vector()).norm() < 1e-12);
}

#[rstest]
fn zero_duration_maneuver(prop: Propagator<OrbitalDynamics>, burn: FiniteBurn) {
    let chief = geo_chief();
    let end = prop.with(chief).maneuver(burn, Duration::ZERO).unwrap();
    assert_eq!(end, chief);
}

#[rstest]
fn split_maneuver_matches_single_maneuver(prop: Propagator<OrbitalDynamics>) {
    let chief = geo_chief();
    // Spends more than the initial mass over the whole burn, but only 60 kg per step
    let burn = FiniteBurn::new(Vector3::new(0.0, 1.0, 0.0), 1.0, 500.0, 300.0).unwrap();

    let single = prop.with(chief).maneuver(burn, 10 * Unit::Minute).unwrap();

    let mut instance = prop.with(chief);
    instance.maneuver(burn, 5 * Unit::Minute).unwrap();
    let split = instance.maneuver(burn, 5 * Unit::Minute).unwrap();

    assert_eq!(single.epoch, split.epoch);
    assert!((single.to_vector() - split.to_vector()).norm() < 1e-9);

    let coast = prop.with(chief).for_duration(10 * Unit::Minute).unwrap();
    let expected_km_s = 10.0 * burn.delta_v_km_s(60.0).unwrap();
    let achieved = (single.velocity_km_s - coast.velocity_km_s).norm();
    assert!(
        (achieved - expected_km_s).abs() < 1e-3 * expected_km_s,
        "achieved {achieved} km/s, expected {expected_km_s} km/s"
    );
}

#[rstest]
fn fuel_exhaustion(prop: Propagator<OrbitalDynamics>) {
    let chief = geo_chief();
    // 500 kg are spent after 50 s, within the first one minute step
    let burn = FiniteBurn::new(Vector3::x(), 10.0, 500.0, 300.0).unwrap();
    assert_eq!(burn.max_duration_s(), 50.0);

    let mut instance = prop.with(chief);
    let rslt = instance.maneuver(burn, 3 * Unit::Minute);
    assert!(matches!(
        rslt,
        Err(PropagationError::Dynamics {
            source: DynamicsError::FuelExhausted { .. }
        })
    ));
    assert_eq!(instance.state, chief);

    // A shorter burn fits in a single step
    assert!(prop.with(chief).maneuver(burn, 40 * Unit::Second).is_ok());
}

#[rstest]
fn negative_maneuver(prop: Propagator<OrbitalDynamics>, burn: FiniteBurn) {
    let rslt = prop.with(geo_chief()).maneuver(burn, -1 * Unit::Minute);
    assert!(matches!(
        rslt,
        Err(PropagationError::Dynamics {
            source: DynamicsError::InvalidBurn { .. }
        })
    ));
}

#[test]
fn invalid_burns() {
    assert!(FiniteBurn::new(Vector3::zeros(), 0.05, 500.0, 300.0).is_err());
    assert!(FiniteBurn::new(Vector3::x(), -0.05, 500.0, 300.0).is_err());
    assert!(FiniteBurn::new(Vector3::x(), 0.05, 0.0, 300.0).is_err());
    assert!(FiniteBurn::new(Vector3::x(), 0.05, 500.0, 0.0).is_err());
}
