/*
    Nyx, blazing fast astrodynamics
    Copyright (C) 2018-onwards Christopher Rabotin <christopher.rabotin@gmail.com>

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use super::{AstroError, DegenerateOrbitSnafu, InertialState};
use crate::linalg::{Matrix3, Vector3, Vector6};
use crate::utils::normalize;
use snafu::ensure;
use std::fmt;

/// Relative state of a deputy with respect to a chief, in the curvilinear Hill frame.
///
/// The first component of the position is the exact radial separation. The in-track and
/// cross-track components are angles scaled by the radius of the chief (arc lengths), not
/// Cartesian offsets.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct HillState {
    pub radius_km: Vector3<f64>,
    pub velocity_km_s: Vector3<f64>,
}

impl HillState {
    pub fn new(radius_km: Vector3<f64>, velocity_km_s: Vector3<f64>) -> Self {
        Self {
            radius_km,
            velocity_km_s,
        }
    }

    pub fn from_vector(pos_vel: &Vector6<f64>) -> Self {
        Self::new(
            pos_vel.fixed_rows::<3>(0).into_owned(),
            pos_vel.fixed_rows::<3>(3).into_owned(),
        )
    }

    pub fn to_vector(&self) -> Vector6<f64> {
        Vector6::new(
            self.radius_km.x,
            self.radius_km.y,
            self.radius_km.z,
            self.velocity_km_s.x,
            self.velocity_km_s.y,
            self.velocity_km_s.z,
        )
    }

    /// Builds the Hill state of the deputy relative to the chief, see [to_hill].
    pub fn from_inertial(
        chief: &InertialState,
        deputy: &InertialState,
    ) -> Result<Self, AstroError> {
        to_hill(chief, deputy)
    }

    /// Converts this relative state back into the inertial state of the deputy, see [to_inertial].
    pub fn to_inertial(&self, chief: &InertialState) -> Result<InertialState, AstroError> {
        to_inertial(self, chief)
    }
}

impl fmt::Display for HillState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "RIC position = [{:.6}, {:.6}, {:.6}] km\tvelocity = [{:.9}, {:.9}, {:.9}] km/s",
            self.radius_km.x,
            self.radius_km.y,
            self.radius_km.z,
            self.velocity_km_s.x,
            self.velocity_km_s.y,
            self.velocity_km_s.z
        )
    }
}

/// Returns the rotation from the inertial frame to the radial/in-track/cross-track frame of the chief.
///
/// The rows are the unit radial vector, the unit in-track vector (cross-track x radial), and
/// the unit orbit normal.
pub fn ric_frame(chief: &InertialState) -> Result<Matrix3<f64>, AstroError> {
    ensure!(
        chief.hmag() > 0.0,
        DegenerateOrbitSnafu {
            action: "building the RIC frame of the chief"
        }
    );
    let r_hat = normalize(&chief.radius_km, "normalizing the chief radius")?;
    let c_hat = normalize(&chief.hvec(), "normalizing the chief orbit normal")?;
    let i_hat = c_hat.cross(&r_hat);

    Ok(Matrix3::from_rows(&[
        r_hat.transpose(),
        i_hat.transpose(),
        c_hat.transpose(),
    ]))
}

/// Rotation from the RIC frame into the local south/east/zenith frame at the given curvilinear angles.
fn sez_frame(lat_rad: f64, long_rad: f64) -> Matrix3<f64> {
    let (s_lat, c_lat) = lat_rad.sin_cos();
    let (s_long, c_long) = long_rad.sin_cos();
    Matrix3::new(
        s_lat * c_long,
        s_lat * s_long,
        -c_lat,
        -s_long,
        c_long,
        0.0,
        c_lat * c_long,
        c_lat * s_long,
        s_lat,
    )
}

/// Computes the exact curvilinear Hill state of the deputy relative to the chief.
///
/// No small angle approximation is made: this is the exact inverse of [to_inertial].
/// Fails if the chief has no angular momentum, if the deputy is at the origin, or if the deputy
/// lies on the orbit normal of the chief (where the in-track angle is undefined).
pub fn to_hill(chief: &InertialState, deputy: &InertialState) -> Result<HillState, AstroError> {
    let ric = ric_frame(chief)?;
    let chief_rmag = chief.rmag_km();
    let deputy_rmag = deputy.rmag_km();
    ensure!(
        deputy_rmag > 0.0,
        DegenerateOrbitSnafu {
            action: "computing the Hill state of a deputy at the origin"
        }
    );

    let chief_vel_ric = ric * chief.velocity_km_s;
    let deputy_pos_ric = ric * deputy.radius_km;
    let deputy_vel_ric = ric * deputy.velocity_km_s;

    let lat = (deputy_pos_ric.z / deputy_rmag).asin();
    let long = deputy_pos_ric.y.atan2(deputy_pos_ric.x);
    let cos_lat = lat.cos();
    ensure!(
        cos_lat.abs() > f64::EPSILON,
        DegenerateOrbitSnafu {
            action: "computing the Hill state of a deputy on the chief orbit normal"
        }
    );

    let chief_long_rate = chief_vel_ric.y / chief_rmag;

    let sez_vel = sez_frame(lat, long) * deputy_vel_ric;
    let lat_rate = -sez_vel.x / deputy_rmag;
    let long_rate = sez_vel.y / (deputy_rmag * cos_lat);

    Ok(HillState::new(
        Vector3::new(deputy_rmag - chief_rmag, long * chief_rmag, lat * chief_rmag),
        Vector3::new(
            sez_vel.z - chief_vel_ric.x,
            chief_rmag * (long_rate - chief_long_rate),
            chief_rmag * lat_rate,
        ),
    ))
}

/// Converts a curvilinear Hill state back to the inertial state of the deputy, at the epoch of the chief.
pub fn to_inertial(hill: &HillState, chief: &InertialState) -> Result<InertialState, AstroError> {
    let ric = ric_frame(chief)?;
    let chief_rmag = chief.rmag_km();
    let chief_vel_ric = ric * chief.velocity_km_s;
    let chief_long_rate = chief_vel_ric.y / chief_rmag;

    let deputy_rmag = chief_rmag + hill.radius_km.x;
    let long = hill.radius_km.y / chief_rmag;
    let lat = hill.radius_km.z / chief_rmag;
    let (s_lat, c_lat) = lat.sin_cos();
    let (s_long, c_long) = long.sin_cos();

    let radial_rate = hill.velocity_km_s.x + chief_vel_ric.x;
    let long_rate = hill.velocity_km_s.y / chief_rmag + chief_long_rate;
    let lat_rate = hill.velocity_km_s.z / chief_rmag;

    let sez_vel = Vector3::new(
        -deputy_rmag * lat_rate,
        deputy_rmag * long_rate * c_lat,
        radial_rate,
    );
    let deputy_vel_ric = sez_frame(lat, long).transpose() * sez_vel;
    let deputy_pos_ric = Vector3::new(
        c_lat * deputy_rmag * c_long,
        c_lat * deputy_rmag * s_long,
        s_lat * deputy_rmag,
    );

    let ric_to_inertial = ric.transpose();
    Ok(InertialState::new(
        chief.epoch,
        ric_to_inertial * deputy_pos_ric,
        ric_to_inertial * deputy_vel_ric,
    ))
}
