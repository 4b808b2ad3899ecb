use crate::{geo_chief, geo_deputy_hill, scenario_epoch};
use relnav::cosmic::EARTH_MU_KM3_S2;
use relnav::dynamics::ForceModelConfig;
use relnav::io::checkpoint::{FilterCheckpoint, HillCheckpoint, StateCheckpoint};
use relnav::io::ConfigRepr;
use relnav::od::{KalmanConfig, PositionObsSimulator, RelativeKalman};
use relnav::propagators::{HillPropagator, PropOpts};
use relnav::time::Unit;
use relnav::{InertialState, RelnavError};

#[test]
fn prop_opts_yaml() {
    let opts = PropOpts::loads("step: 30 s\nmax_step: 1 min\n").unwrap();
    assert_eq!(opts.step, 30 * Unit::Second);
    assert_eq!(opts.max_step, 1 * Unit::Minute);

    let defaults = PropOpts::loads("{}").unwrap();
    assert_eq!(defaults, PropOpts::default());

    let dumped = opts.dumps().unwrap();
    assert_eq!(PropOpts::loads(&dumped).unwrap(), opts);

    let many = PropOpts::loads_many("- step: 10 s\n- max_step: 2 min\n").unwrap();
    assert_eq!(many.len(), 2);
    assert_eq!(many[0].step, 10 * Unit::Second);
    assert_eq!(many[1].max_step, 2 * Unit::Minute);
}

#[test]
fn force_model_yaml() {
    let cfg = ForceModelConfig::loads("srp_scalar_m2_kg: 0.015\n").unwrap();
    assert!(cfg.luni_solar);
    assert_eq!(cfg.geopotential_degree, 4);
    assert_eq!(cfg.srp_scalar_m2_kg, 0.015);
    assert_eq!(ForceModelConfig::loads("{}").unwrap(), ForceModelConfig::default());

    let two_body =
        ForceModelConfig::loads("luni_solar: false\ngeopotential_degree: 0\n").unwrap();
    assert_eq!(two_body, ForceModelConfig::two_body());

    assert!(ForceModelConfig::loads("luni_solar: maybe\n").is_err());
}

#[test]
fn config_from_file() {
    let path = std::env::temp_dir().join(format!("relnav-{}-kf.yaml", std::process::id()));
    let cfg = KalmanConfig::builder()
        .process_noise_diag([1e-8, 1e-8, 1e-8, 1e-12, 1e-12, 1e-12])
        .build();
    std::fs::write(&path, cfg.dumps().unwrap()).unwrap();
    assert_eq!(KalmanConfig::load(&path).unwrap(), cfg);
    std::fs::remove_file(&path).unwrap();

    // Every module error converts into the crate error
    let missing: Result<KalmanConfig, RelnavError> =
        KalmanConfig::load(&path).map_err(RelnavError::from);
    assert!(matches!(missing, Err(RelnavError::Config { .. })));
}

#[test]
fn state_checkpoint() {
    let chief = geo_chief();
    let ckpt = StateCheckpoint::from(&chief);
    let loaded = StateCheckpoint::loads(&ckpt.dumps().unwrap()).unwrap();
    assert_eq!(loaded, ckpt);

    let restored = InertialState::from(&loaded);
    assert_eq!(restored.radius_km, chief.radius_km);
    assert_eq!(restored.velocity_km_s, chief.velocity_km_s);
    // The MJD is stored as a double
    assert!((restored.epoch - chief.epoch).abs() < 1 * Unit::Millisecond);

    let hill = HillCheckpoint::new(chief.epoch, &geo_deputy_hill());
    assert_eq!(hill.state(), geo_deputy_hill());
}

#[test]
fn filter_checkpoint_resumes() {
    let prop = HillPropagator::new(geo_deputy_hill(), 42_164.0, EARTH_MU_KM3_S2);
    let mut kf = RelativeKalman::new(scenario_epoch(), prop, &KalmanConfig::default()).unwrap();
    let mut truth = prop;
    let mut sim = PositionObsSimulator::new(3, 0.01, 0.0).unwrap();

    let mut epoch = scenario_epoch();
    for _ in 0..5 {
        epoch += 5 * Unit::Minute;
        truth.step_by_seconds(300.0);
        kf.process(&sim.observe(epoch, &truth.state).unwrap())
            .unwrap();
    }

    let ckpt = FilterCheckpoint::from(&kf);
    assert_eq!(ckpt.covariance.len(), 36);
    let restored = FilterCheckpoint::loads(&ckpt.dumps().unwrap())
        .unwrap()
        .to_filter()
        .unwrap();
    assert_eq!(restored.covariance, kf.covariance);
    assert_eq!(restored.process_noise, kf.process_noise);
    assert_eq!(restored.estimate(), kf.estimate());
    assert!(restored.measurement().is_none());

    let mut truncated = ckpt;
    truncated.process_noise.pop();
    assert!(truncated.to_filter().is_err());
}
