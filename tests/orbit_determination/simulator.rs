use crate::{geo_chief, geo_deputy_hill};
use relnav::cosmic::to_inertial;
use relnav::io::ConfigRepr;
use relnav::od::prelude::*;

#[test]
fn observe_inertial_states() {
    let chief = geo_chief();
    let deputy = to_inertial(&geo_deputy_hill(), &chief).unwrap();

    let mut sim = PositionObsSimulator::new(42, 0.01, 1e-4).unwrap();
    let obs = sim.observe_inertial(&chief, &deputy).unwrap();
    assert_eq!(obs.epoch, chief.epoch);
    assert_eq!(obs.range_error_km, 0.01);
    // 11 km away with 10 m of range noise and about 1 m of pointing noise
    assert!((obs.position_km - geo_deputy_hill().radius_km).norm() < 0.1);

    // The noise of the observation is along the line of sight
    let noise = obs.noise().unwrap();
    assert!((noise.trace() - 1e-4).abs() < 1e-12);
    assert!(noise[(0, 0)] > 0.99e-4);
}

#[test]
fn observation_yaml() {
    let mut sim = PositionObsSimulator::new(0, 0.01, 0.0).unwrap();
    let obs = sim
        .observe(crate::scenario_epoch(), &geo_deputy_hill())
        .unwrap();
    let yaml = obs.dumps().unwrap();
    let loaded = PositionObservation::loads(&yaml).unwrap();
    assert_eq!(loaded.epoch, obs.epoch);
    assert_eq!(loaded.position_km, obs.position_km);
    assert_eq!(loaded.range_error_km, obs.range_error_km);
}
