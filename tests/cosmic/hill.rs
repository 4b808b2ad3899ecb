use crate::{geo_chief, geo_deputy_hill};
use relnav::cosmic::{ric_frame, to_hill, to_inertial, AstroError};
use relnav::linalg::Vector3;
use relnav::utils::is_orthogonal;
use relnav::{HillState, InertialState};
use rstest::*;

fn leo_chief() -> InertialState {
    InertialState::cartesian(
        6_878.0,
        120.0,
        -300.0,
        0.05,
        6.2,
        4.1,
        crate::scenario_epoch(),
    )
}

#[rstest]
#[case(geo_chief())]
#[case(leo_chief())]
fn ric_is_orthonormal(#[case] chief: InertialState) {
    let dcm = ric_frame(&chief).unwrap();
    assert!(is_orthogonal(&dcm, 1e-12));
    assert!((dcm.determinant() - 1.0).abs() < 1e-12);
    // Radial axis along the chief position
    assert!((dcm * chief.radius_km).y.abs() < 1e-9);
    assert!((dcm * chief.radius_km).z.abs() < 1e-9);
}

#[rstest]
#[case(geo_chief(), geo_deputy_hill())]
#[case(geo_chief(), HillState::new(Vector3::new(2.0, -150.0, 30.0), Vector3::new(1e-3, -2e-3, 5e-4)))]
#[case(leo_chief(), HillState::new(Vector3::new(-0.5, 3.0, 0.2), Vector3::new(1e-4, 2e-4, -3e-4)))]
fn hill_round_trip(#[case] chief: InertialState, #[case] hill: HillState) {
    let deputy = to_inertial(&hill, &chief).unwrap();
    assert_eq!(deputy.epoch, chief.epoch);
    let back = to_hill(&chief, &deputy).unwrap();

    assert!(
        (back.radius_km - hill.radius_km).norm() < 1e-8,
        "position error {}",
        (back.radius_km - hill.radius_km).norm()
    );
    assert!(
        (back.velocity_km_s - hill.velocity_km_s).norm() < 1e-11,
        "velocity error {}",
        (back.velocity_km_s - hill.velocity_km_s).norm()
    );

    // And the other way around, through the method forms
    let deputy_again = back.to_inertial(&chief).unwrap();
    assert!(deputy_again.eq_within(&deputy, 1e-8, 1e-11));
    assert_eq!(HillState::from_inertial(&chief, &deputy).unwrap(), back);
}

#[test]
fn chief_relative_to_itself() {
    let chief = geo_chief();
    let hill = to_hill(&chief, &chief).unwrap();
    assert!(hill.radius_km.norm() < 1e-12);
    assert!(hill.velocity_km_s.norm() < 1e-15);
}

#[test]
fn radial_offset_is_exact() {
    // A deputy on the same radial line is offset only radially, even far from the chief.
    let chief = geo_chief();
    let mut deputy = chief;
    deputy.radius_km *= 1.01;
    let hill = to_hill(&chief, &deputy).unwrap();
    assert!((hill.radius_km.x - 421.64).abs() < 1e-9);
    assert!(hill.radius_km.y.abs() < 1e-9);
    assert!(hill.radius_km.z.abs() < 1e-9);
}

#[test]
fn degenerate_chief() {
    let epoch = crate::scenario_epoch();
    let radial_only = InertialState::cartesian(7_000.0, 0.0, 0.0, 1.0, 0.0, 0.0, epoch);
    assert!(matches!(
        ric_frame(&radial_only),
        Err(AstroError::DegenerateOrbit { .. })
    ));

    let chief = geo_chief();
    let origin = InertialState::cartesian(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, epoch);
    assert!(to_hill(&chief, &origin).is_err());

    // On the orbit normal of the chief, the in-track angle is undefined
    let polar = InertialState::cartesian(0.0, 0.0, 42_164.0, 0.0, 0.0, 0.0, epoch);
    assert!(to_hill(&chief, &polar).is_err());
}
