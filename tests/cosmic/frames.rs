use crate::scenario_epoch;
use relnav::cosmic::{
    EarthOrientation, EopRecord, EopTable, Geodetic, EARTH_EQUATORIAL_RADIUS_KM, EARTH_FLATTENING,
};
use relnav::linalg::{Matrix3, Vector3};
use relnav::time::Unit;
use relnav::utils::is_orthogonal;
use rstest::*;

#[fixture]
fn orientation() -> EarthOrientation {
    let mjd = scenario_epoch().to_mjd_utc_days().floor();
    EarthOrientation::new(EopTable::from_records([
        EopRecord {
            mjd_utc: mjd,
            ut1_utc_s: -0.0170,
            x_pole_rad: 0.07e-5,
            y_pole_rad: 0.17e-5,
            dpsi_rad: 0.0,
            deps_rad: 0.0,
        },
        EopRecord {
            mjd_utc: mjd + 1.0,
            ut1_utc_s: -0.0180,
            x_pole_rad: 0.08e-5,
            y_pole_rad: 0.16e-5,
            dpsi_rad: 0.0,
            deps_rad: 0.0,
        },
    ]))
}

#[rstest]
fn gcrf_itrf_is_a_rotation(orientation: EarthOrientation) {
    for hours in [0, 6, 13, 23] {
        let epoch = scenario_epoch() + hours * Unit::Hour;
        let dcm = orientation.gcrf_to_itrf(epoch);
        assert!(is_orthogonal(&dcm, 1e-12), "{dcm}");
        assert!((dcm.determinant() - 1.0).abs() < 1e-12);
        let back = orientation.itrf_to_gcrf(epoch) * dcm;
        assert!((back - Matrix3::identity()).abs().max() < 1e-12);
    }
}

#[rstest]
fn eop_interpolation(orientation: EarthOrientation) {
    let noon = scenario_epoch() + 12 * Unit::Hour;
    let offsets = orientation.time_offsets(noon);
    assert!((offsets.ut1_utc_s + 0.0175).abs() < 1e-9);
    // 37 leap seconds in 2022
    assert!((offsets.tt_utc_s - 69.184).abs() < 1e-6);

    // Outside of the table, the edge records are used
    let later = scenario_epoch() + 30 * Unit::Day;
    assert!((orientation.record(later).ut1_utc_s + 0.0180).abs() < 1e-12);
    let earlier = scenario_epoch() - 30 * Unit::Day;
    assert!((orientation.record(earlier).ut1_utc_s + 0.0170).abs() < 1e-12);
}

#[test]
fn sidereal_rotation() {
    let orientation = EarthOrientation::without_eop();
    let epoch = scenario_epoch();
    // One sidereal day later, the Earth fixed frame is back to the same orientation
    let sidereal_day = 86_164.090_5 * Unit::Second;
    let delta = orientation.gmst(epoch + sidereal_day) - orientation.gmst(epoch);
    let wrapped = (delta + std::f64::consts::PI).rem_euclid(std::f64::consts::TAU)
        - std::f64::consts::PI;
    assert!(wrapped.abs() < 1e-5);

    // GMST at 0h UT1 on 2022-12-20 is about 5h 54m
    let gmst_hours = orientation.gmst(epoch).to_degrees() / 15.0;
    assert!((gmst_hours - 5.904).abs() < 0.01, "GMST = {gmst_hours} h");
}

#[rstest]
#[case(Vector3::new(6_524.834, 6_862.875, 6_448.296))]
#[case(Vector3::new(-1_523.2, 4_211.9, -4_522.0))]
#[case(Vector3::new(42_164.0, 0.0, 0.0))]
fn geodetic_round_trip(#[case] itrf_km: Vector3<f64>) {
    let geod = Geodetic::from_itrf(&itrf_km, EARTH_EQUATORIAL_RADIUS_KM, EARTH_FLATTENING).unwrap();
    let back = geod.to_itrf(EARTH_EQUATORIAL_RADIUS_KM, EARTH_FLATTENING);
    assert!((back - itrf_km).norm() < 1e-7, "{geod:?}");
}

#[test]
fn geodetic_of_equator() {
    let geod = Geodetic::from_itrf(
        &Vector3::new(0.0, EARTH_EQUATORIAL_RADIUS_KM + 500.0, 0.0),
        EARTH_EQUATORIAL_RADIUS_KM,
        EARTH_FLATTENING,
    )
    .unwrap();
    assert!(geod.latitude_rad.abs() < 1e-12);
    assert!((geod.longitude_rad - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    assert!((geod.altitude_km - 500.0).abs() < 1e-9);
}
