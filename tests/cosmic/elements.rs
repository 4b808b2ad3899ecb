use crate::scenario_epoch;
use relnav::cosmic::{assert_state_eq_or_abs, ClassicalElements, EARTH_MU_KM3_S2};
use rstest::*;

#[rstest]
#[case(7_000.0, 0.01, 51.6, 30.0, 45.0, 10.0)]
#[case(26_560.0, 0.7, 63.4, 120.0, 270.0, 180.0)]
#[case(42_164.0, 1e-4, 0.05, 75.0, 10.0, 300.0)]
fn elements_round_trip(
    #[case] sma_km: f64,
    #[case] ecc: f64,
    #[case] inc_deg: f64,
    #[case] raan_deg: f64,
    #[case] aop_deg: f64,
    #[case] ma_deg: f64,
) {
    let elements = ClassicalElements::new(
        sma_km,
        ecc,
        inc_deg.to_radians(),
        raan_deg.to_radians(),
        aop_deg.to_radians(),
        ma_deg.to_radians(),
    );
    let state = elements.to_state(scenario_epoch(), EARTH_MU_KM3_S2).unwrap();
    let back = ClassicalElements::from_state(&state, EARTH_MU_KM3_S2).unwrap();
    println!("{back}");

    assert!((back.sma_km - sma_km).abs() < 1e-6);
    assert!((back.ecc - ecc).abs() < 1e-10);
    assert!((back.inc_rad - elements.inc_rad).abs() < 1e-10);

    let again = back.to_state(scenario_epoch(), EARTH_MU_KM3_S2).unwrap();
    assert_state_eq_or_abs(&again, &state, 1e-6, 1e-9, "elements round trip");
}

#[test]
fn kepler_equation() {
    let elements = ClassicalElements::new(7_000.0, 0.3, 0.5, 0.0, 0.0, 1.0);
    let ea = elements.eccentric_anomaly().unwrap();
    assert!((ea - 0.3 * ea.sin() - 1.0).abs() < 1e-12);
    assert!((elements.period_s(EARTH_MU_KM3_S2) * elements.mean_motion_rad_s(EARTH_MU_KM3_S2)
        - std::f64::consts::TAU)
        .abs()
        < 1e-12);
}

#[test]
fn open_orbits_are_rejected() {
    let hyperbola = ClassicalElements::new(-20_000.0, 1.5, 0.5, 0.0, 0.0, 0.0);
    assert!(hyperbola.to_state(scenario_epoch(), EARTH_MU_KM3_S2).is_err());
}
