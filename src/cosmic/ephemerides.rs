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

//! Closed form series of Montenbruck and Gill (Satellite Orbits, section 3.3.2), accurate to a
//! few tens of km for the Moon and about 0.1% of the distance for the Sun. The outputs are in
//! the Earth mean equator and equinox of J2000, in km.

use super::{julian_centuries_tt, ARCSEC_TO_RAD};
use crate::linalg::Vector3;
use crate::time::Epoch;
use crate::utils::r1;

/// Obliquity of the ecliptic at J2000, in radians
pub fn obliquity_j2000() -> f64 {
    (23.439_291_11_f64).to_radians()
}

/// Rotates an ecliptic position into the equatorial frame.
fn ecliptic_to_equatorial(ecliptic: Vector3<f64>) -> Vector3<f64> {
    r1(-obliquity_j2000()) * ecliptic
}

/// Position of the Sun with respect to the Earth, in km.
pub fn sun_position(epoch: Epoch) -> Vector3<f64> {
    let t = julian_centuries_tt(epoch);
    let ma = (357.5256 + 35_999.049 * t).to_radians();
    let longitude = (282.94_f64).to_radians()
        + ma
        + (6_892.0 * ma.sin() + 72.0 * (2.0 * ma).sin()) * ARCSEC_TO_RAD;
    let rmag_km = (149.619 - 2.499 * ma.cos() - 0.021 * (2.0 * ma).cos()) * 1e6;

    ecliptic_to_equatorial(Vector3::new(
        rmag_km * longitude.cos(),
        rmag_km * longitude.sin(),
        0.0,
    ))
}

/// Position of the Moon with respect to the Earth, in km.
pub fn moon_position(epoch: Epoch) -> Vector3<f64> {
    let t = julian_centuries_tt(epoch);
    // Mean longitude, referred to the J2000 equinox
    let l0 = (218.316_17 + 481_267.880_88 * t - 1.3972 * t).to_radians();
    // Mean anomaly of the Moon
    let l = (134.962_92 + 477_198.867_53 * t).to_radians();
    // Mean anomaly of the Sun
    let lp = (357.525_43 + 35_999.049_44 * t).to_radians();
    // Mean distance of the Moon from its ascending node
    let f = (93.272_83 + 483_202.018_73 * t).to_radians();
    // Difference between the mean longitudes of the Sun and the Moon
    let d = (297.850_27 + 445_267.111_35 * t).to_radians();

    let longitude = l0
        + (22_640.0 * l.sin() + 769.0 * (2.0 * l).sin() - 4_586.0 * (l - 2.0 * d).sin()
            + 2_370.0 * (2.0 * d).sin()
            - 668.0 * lp.sin()
            - 412.0 * (2.0 * f).sin()
            - 212.0 * (2.0 * l - 2.0 * d).sin()
            - 206.0 * (l + lp - 2.0 * d).sin()
            + 192.0 * (l + 2.0 * d).sin()
            - 165.0 * (lp - 2.0 * d).sin()
            + 148.0 * (l - lp).sin()
            - 125.0 * d.sin()
            - 110.0 * (l + lp).sin()
            - 55.0 * (2.0 * f - 2.0 * d).sin())
            * ARCSEC_TO_RAD;

    let latitude = (18_520.0
        * (f + longitude - l0 + (412.0 * (2.0 * f).sin() + 541.0 * lp.sin()) * ARCSEC_TO_RAD)
            .sin()
        - 526.0 * (f - 2.0 * d).sin()
        + 44.0 * (l + f - 2.0 * d).sin()
        - 31.0 * (-l + f - 2.0 * d).sin()
        - 25.0 * (-2.0 * l + f).sin()
        - 23.0 * (lp + f - 2.0 * d).sin()
        + 21.0 * (-l + f).sin()
        + 11.0 * (-lp + f - 2.0 * d).sin())
        * ARCSEC_TO_RAD;

    let rmag_km = 385_000.0
        - 20_905.0 * l.cos()
        - 3_699.0 * (2.0 * d - l).cos()
        - 2_956.0 * (2.0 * d).cos()
        - 570.0 * (2.0 * l).cos()
        + 246.0 * (2.0 * l - 2.0 * d).cos()
        - 205.0 * (lp - 2.0 * d).cos()
        - 171.0 * (l + 2.0 * d).cos()
        - 152.0 * (l + lp - 2.0 * d).cos();

    let (s_lat, c_lat) = latitude.sin_cos();
    ecliptic_to_equatorial(Vector3::new(
        rmag_km * c_lat * longitude.cos(),
        rmag_km * c_lat * longitude.sin(),
        rmag_km * s_lat,
    ))
}
