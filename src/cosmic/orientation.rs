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

use super::eop::{EopRecord, EopTable};
use super::{
    julian_centuries_tt, AstroError, GeodeticNonConvergenceSnafu, ARCSEC_TO_RAD, DAYS_PER_CENTURY,
    MJD_J2000, SECONDS_PER_DAY, TT_MINUS_TAI_S,
};
use crate::linalg::{Matrix3, Vector3};
use crate::time::Epoch;
use crate::utils::{between_0_360, r1, r2, r3};
use serde_derive::{Deserialize, Serialize};

/// Offsets of TT and UT1 from UTC at a given epoch, in seconds.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeOffsets {
    pub tt_utc_s: f64,
    pub ut1_utc_s: f64,
}

/// Nutation angles of date, in radians.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NutationAngles {
    pub mean_obliquity_rad: f64,
    pub dpsi_rad: f64,
    pub deps_rad: f64,
}

/// Mean obliquity of the ecliptic (IAU-76) at the provided Julian centuries (TT) past J2000, in radians.
pub fn mean_obliquity(centuries_tt: f64) -> f64 {
    let t = centuries_tt;
    (23.439_291_11_f64).to_radians()
        - (46.815 * t + 0.000_59 * t.powi(2) - 0.001_813 * t.powi(3)) * ARCSEC_TO_RAD
}

/// Orientation of the Earth: GCRF to ITRF through the mean and true equator of date.
///
/// This is built once (with or without EOP data) and shared read-only across every force model
/// and frame transformation, typically as an `Arc<EarthOrientation>`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EarthOrientation {
    pub eop: EopTable,
}

impl EarthOrientation {
    pub fn new(eop: EopTable) -> Self {
        Self { eop }
    }

    /// Earth orientation without any EOP data: UT1 equals UTC, without polar motion nor nutation corrections.
    pub fn without_eop() -> Self {
        Self::default()
    }

    /// Returns the interpolated EOP record at this epoch.
    pub fn record(&self, epoch: Epoch) -> EopRecord {
        self.eop.at(epoch.to_mjd_utc_days())
    }

    /// Returns the TT-UTC and UT1-UTC offsets at this epoch.
    pub fn time_offsets(&self, epoch: Epoch) -> TimeOffsets {
        let tai_utc_s = (epoch.to_tai_duration() - epoch.to_utc_duration()).to_seconds();
        TimeOffsets {
            tt_utc_s: tai_utc_s + TT_MINUS_TAI_S,
            ut1_utc_s: self.record(epoch).ut1_utc_s,
        }
    }

    /// Greenwich mean sidereal time in radians, computed from UT1.
    pub fn gmst(&self, epoch: Epoch) -> f64 {
        let mjd_ut1 = epoch.to_mjd_utc_days() + self.record(epoch).ut1_utc_s / SECONDS_PER_DAY;
        let midnight = mjd_ut1.floor();
        let day_fraction = mjd_ut1 - midnight;
        let j0 = (midnight - MJD_J2000) / DAYS_PER_CENTURY;

        let theta0_deg = 100.460_618_4 + 36_000.770_04 * j0 + 0.000_387_933 * j0.powi(2);
        between_0_360(theta0_deg + 360.985_647_24 * day_fraction).to_radians()
    }

    /// Greenwich hour angle (apparent sidereal time) in radians: GMST plus the equation of the equinoxes.
    pub fn greenwich_hour_angle(&self, epoch: Epoch) -> f64 {
        let angles = self.nutation_angles(epoch);
        let gast = self.gmst(epoch) + angles.dpsi_rad * angles.mean_obliquity_rad.cos();
        gast.rem_euclid(std::f64::consts::TAU)
    }

    /// Low order nutation series in longitude and obliquity, including the EOP corrections.
    pub fn nutation_angles(&self, epoch: Epoch) -> NutationAngles {
        let t = julian_centuries_tt(epoch);
        let days = t * DAYS_PER_CENTURY;
        let arg1 = (125.0 - 0.052_95 * days).to_radians();
        let arg2 = (200.9 + 1.971_29 * days).to_radians();
        let record = self.record(epoch);

        NutationAngles {
            mean_obliquity_rad: mean_obliquity(t),
            dpsi_rad: (-0.0048 * arg1.sin() - 0.0004 * arg2.sin()).to_radians() + record.dpsi_rad,
            deps_rad: (0.0026 * arg1.cos() + 0.0002 * arg2.cos()).to_radians() + record.deps_rad,
        }
    }

    /// Precession (IAU-76) rotation from GCRF to the mean equator of date (MOD).
    pub fn precession(&self, epoch: Epoch) -> Matrix3<f64> {
        let t = julian_centuries_tt(epoch);
        let zeta = (2306.2181 * t + 0.301_88 * t.powi(2) + 0.017_998 * t.powi(3)) * ARCSEC_TO_RAD;
        let theta = (2004.3109 * t - 0.426_65 * t.powi(2) - 0.041_833 * t.powi(3)) * ARCSEC_TO_RAD;
        let z = (2306.2181 * t + 1.094_68 * t.powi(2) + 0.018_203 * t.powi(3)) * ARCSEC_TO_RAD;

        r3(-z) * r2(theta) * r3(-zeta)
    }

    /// Nutation rotation from the mean equator of date (MOD) to the true equator of date (TOD).
    pub fn nutation(&self, epoch: Epoch) -> Matrix3<f64> {
        let angles = self.nutation_angles(epoch);
        let true_obliquity = angles.mean_obliquity_rad + angles.deps_rad;

        r1(-true_obliquity) * r3(-angles.dpsi_rad) * r1(angles.mean_obliquity_rad)
    }

    /// Earth rotation from the true equator of date (TOD) to the Earth fixed frame (ITRF), including polar motion.
    pub fn rotation(&self, epoch: Epoch) -> Matrix3<f64> {
        let record = self.record(epoch);
        let polar_motion = r2(-record.x_pole_rad) * r1(-record.y_pole_rad);

        polar_motion * r3(self.greenwich_hour_angle(epoch))
    }

    /// Rotation from GCRF to ITRF: rotation * nutation * precession.
    pub fn gcrf_to_itrf(&self, epoch: Epoch) -> Matrix3<f64> {
        self.rotation(epoch) * self.nutation(epoch) * self.precession(epoch)
    }

    /// Rotation from ITRF to GCRF, the transpose of [Self::gcrf_to_itrf].
    pub fn itrf_to_gcrf(&self, epoch: Epoch) -> Matrix3<f64> {
        self.gcrf_to_itrf(epoch).transpose()
    }
}

/// Geodetic coordinates over an ellipsoid. Angles are in radians.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Geodetic {
    pub latitude_rad: f64,
    pub longitude_rad: f64,
    pub altitude_km: f64,
}

impl Geodetic {
    const MAX_ITER: usize = 50;
    const TOLERANCE_RAD: f64 = 1e-12;

    /// Computes the geodetic coordinates of an Earth fixed position over the ellipsoid of the provided equatorial radius and flattening.
    pub fn from_itrf(
        itrf_km: &Vector3<f64>,
        eq_radius_km: f64,
        flattening: f64,
    ) -> Result<Self, AstroError> {
        let ecc_sq = 2.0 * flattening - flattening.powi(2);
        let r_eq = itrf_km.x.hypot(itrf_km.y);
        let longitude_rad = itrf_km.y.atan2(itrf_km.x);

        let mut latitude_rad = itrf_km.z.atan2(r_eq);
        let mut converged = false;
        let mut c_term = eq_radius_km;
        for _ in 0..Self::MAX_ITER {
            let s_lat = latitude_rad.sin();
            c_term = eq_radius_km / (1.0 - ecc_sq * s_lat.powi(2)).sqrt();
            let next = (itrf_km.z + c_term * ecc_sq * s_lat).atan2(r_eq);
            let delta = (next - latitude_rad).abs();
            latitude_rad = next;
            if delta < Self::TOLERANCE_RAD {
                converged = true;
                break;
            }
        }
        if !converged {
            return GeodeticNonConvergenceSnafu {
                iterations: Self::MAX_ITER,
            }
            .fail();
        }

        let (s_lat, c_lat) = latitude_rad.sin_cos();
        let altitude_km = if c_lat.abs() > 1e-10 {
            r_eq / c_lat - c_term
        } else {
            itrf_km.z / s_lat - c_term * (1.0 - ecc_sq)
        };

        Ok(Self {
            latitude_rad,
            longitude_rad,
            altitude_km,
        })
    }

    /// Returns the Earth fixed position of these geodetic coordinates.
    pub fn to_itrf(&self, eq_radius_km: f64, flattening: f64) -> Vector3<f64> {
        let ecc_sq = 2.0 * flattening - flattening.powi(2);
        let (s_lat, c_lat) = self.latitude_rad.sin_cos();
        let (s_long, c_long) = self.longitude_rad.sin_cos();
        let c_term = eq_radius_km / (1.0 - ecc_sq * s_lat.powi(2)).sqrt();
        let s_term = c_term * (1.0 - ecc_sq);

        Vector3::new(
            (c_term + self.altitude_km) * c_lat * c_long,
            (c_term + self.altitude_km) * c_lat * s_long,
            (s_term + self.altitude_km) * s_lat,
        )
    }
}
