use crate::{geo_chief, geo_deputy_hill, scenario_epoch};
use relnav::cosmic::attitude::{body_axes, line_of_sight, SteeringMode};
use relnav::cosmic::ephemerides::{moon_position, sun_position};
use relnav::cosmic::{to_inertial, AstroError, AU};
use relnav::time::Unit;
use relnav::utils::is_orthogonal;
use rstest::*;

#[test]
fn sun_distance_and_declination() {
    let epoch = scenario_epoch();
    for day in 0..365 {
        let sun = sun_position(epoch + day * Unit::Day);
        let dist_au = sun.norm() / AU;
        assert!((0.983..=1.017).contains(&dist_au), "{dist_au} AU");
    }

    // Close to the December solstice
    let sun = sun_position(epoch);
    let declination = (sun.z / sun.norm()).asin().to_degrees();
    assert!((declination + 23.4).abs() < 0.2, "declination = {declination}");
}

#[test]
fn moon_distance() {
    let epoch = scenario_epoch();
    for hours in 0..(30 * 24) {
        let dist_km = moon_position(epoch + hours * Unit::Hour).norm();
        assert!((356_000.0..=407_000.0).contains(&dist_km), "{dist_km} km");
    }
}

#[rstest]
#[case(SteeringMode::Lvlh)]
#[case(SteeringMode::Solar)]
#[case(SteeringMode::Target)]
fn body_axes_are_orthonormal(#[case] mode: SteeringMode) {
    let chief = geo_chief();
    let deputy = to_inertial(&geo_deputy_hill(), &chief).unwrap();
    let dcm = body_axes(mode, &chief, Some(&deputy)).unwrap();
    assert!(is_orthogonal(&dcm, 1e-12));
    assert!((dcm.determinant() - 1.0).abs() < 1e-12);

    let x_axis = dcm.row(0).transpose();
    match mode {
        SteeringMode::Lvlh => {
            assert!((x_axis - chief.radius_km.normalize()).norm() < 1e-12)
        }
        SteeringMode::Solar => {
            let to_sun = (sun_position(chief.epoch) - chief.radius_km).normalize();
            assert!((x_axis - to_sun).norm() < 1e-12)
        }
        SteeringMode::Target => {
            let los = line_of_sight(&chief, Some(&deputy)).unwrap();
            assert!((x_axis - los).norm() < 1e-12);
            // The deputy is 11 km below the chief
            assert!((los + chief.radius_km.normalize()).norm() < 1e-6);
        }
    }
}

#[test]
fn target_mode_requires_target() {
    let chief = geo_chief();
    assert_eq!(
        body_axes(SteeringMode::Target, &chief, None),
        Err(AstroError::MissingTarget)
    );
    assert_eq!(line_of_sight(&chief, None), Err(AstroError::MissingTarget));
}
