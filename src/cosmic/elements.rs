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

use super::{AstroError, DegenerateOrbitSnafu, InertialState, KeplerNonConvergenceSnafu};
use crate::linalg::Vector3;
use crate::time::Epoch;
use serde_derive::{Deserialize, Serialize};
use snafu::ensure;
use std::f64::consts::{PI, TAU};
use std::fmt;

/// Below this eccentricity (or normalized node vector norm), the orbit is treated as circular (or equatorial).
pub const ELEMENTS_EPSILON: f64 = 1e-11;
/// Tolerance of the Newton solver of Kepler's equation, in radians
pub const KEPLER_TOLERANCE: f64 = 1e-12;
/// Maximum number of Newton iterations before giving up on Kepler's equation
pub const KEPLER_MAX_ITER: usize = 100;

/// Classical orbital elements of a closed orbit. Angles are in radians.
///
/// The anomalies other than the mean anomaly, and the perifocal frame, are computed on demand.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassicalElements {
    pub sma_km: f64,
    pub ecc: f64,
    pub inc_rad: f64,
    pub raan_rad: f64,
    pub aop_rad: f64,
    pub ma_rad: f64,
}

/// Bounds an angle to [0, 2 pi)
fn between_0_tau(angle_rad: f64) -> f64 {
    angle_rad.rem_euclid(TAU)
}

impl ClassicalElements {
    pub fn new(
        sma_km: f64,
        ecc: f64,
        inc_rad: f64,
        raan_rad: f64,
        aop_rad: f64,
        ma_rad: f64,
    ) -> Self {
        Self {
            sma_km,
            ecc,
            inc_rad,
            raan_rad,
            aop_rad,
            ma_rad,
        }
    }

    /// Computes the classical elements of the provided state.
    ///
    /// For circular orbits the argument of periapsis is zero and the anomaly is counted from the
    /// ascending node; for equatorial orbits the right ascension of the ascending node is zero.
    pub fn from_state(state: &InertialState, mu_km3_s2: f64) -> Result<Self, AstroError> {
        let r = state.radius_km;
        let v = state.velocity_km_s;
        let rmag = state.rmag_km();
        let hvec = state.hvec();
        let hmag = hvec.norm();
        ensure!(
            hmag > 0.0 && rmag > 0.0,
            DegenerateOrbitSnafu {
                action: "computing the classical elements"
            }
        );

        let node = Vector3::new(-hvec.y, hvec.x, 0.0);
        let node_mag = node.norm();
        let equatorial = node_mag / hmag < ELEMENTS_EPSILON;

        let ecc_vec = ((v.norm_squared() - mu_km3_s2 / rmag) * r - r.dot(&v) * v) / mu_km3_s2;
        let ecc = ecc_vec.norm();
        ensure!(
            ecc < 1.0,
            DegenerateOrbitSnafu {
                action: "computing the classical elements of an open orbit"
            }
        );
        let circular = ecc < ELEMENTS_EPSILON;

        let sma_km = state.sma_km(mu_km3_s2)?;
        let inc_rad = (hvec.z / hmag).clamp(-1.0, 1.0).acos();

        let raan_rad = if equatorial {
            0.0
        } else {
            let raan = (node.x / node_mag).clamp(-1.0, 1.0).acos();
            if node.y < 0.0 {
                TAU - raan
            } else {
                raan
            }
        };

        let aop_rad = if circular {
            0.0
        } else if equatorial {
            // Longitude of periapsis
            let lop = ecc_vec.y.atan2(ecc_vec.x);
            if hvec.z < 0.0 {
                between_0_tau(-lop)
            } else {
                between_0_tau(lop)
            }
        } else {
            let aop = (node.dot(&ecc_vec) / (node_mag * ecc)).clamp(-1.0, 1.0).acos();
            if ecc_vec.z < 0.0 {
                TAU - aop
            } else {
                aop
            }
        };

        // Angle from periapsis, or from the node, or from the X axis, depending on the singularities
        let ta_rad = if !circular {
            let ta = (ecc_vec.dot(&r) / (ecc * rmag)).clamp(-1.0, 1.0).acos();
            if r.dot(&v) < 0.0 {
                TAU - ta
            } else {
                ta
            }
        } else if !equatorial {
            let aol = (node.dot(&r) / (node_mag * rmag)).clamp(-1.0, 1.0).acos();
            if r.z < 0.0 {
                TAU - aol
            } else {
                aol
            }
        } else {
            let tlong = r.y.atan2(r.x);
            if hvec.z < 0.0 {
                between_0_tau(-tlong)
            } else {
                between_0_tau(tlong)
            }
        };

        let ea_rad = ((1.0 - ecc.powi(2)).sqrt() * ta_rad.sin()).atan2(ecc + ta_rad.cos());
        let ma_rad = between_0_tau(ea_rad - ecc * ea_rad.sin());

        Ok(Self {
            sma_km,
            ecc,
            inc_rad,
            raan_rad,
            aop_rad,
            ma_rad,
        })
    }

    /// Solves Kepler's equation for the eccentric anomaly, in radians within [0, 2 pi).
    pub fn eccentric_anomaly(&self) -> Result<f64, AstroError> {
        let ma = between_0_tau(self.ma_rad);
        let mut ea = if ma > PI {
            ma - self.ecc
        } else {
            ma + self.ecc
        };

        for _ in 0..KEPLER_MAX_ITER {
            let delta = (ma - ea + self.ecc * ea.sin()) / (1.0 - self.ecc * ea.cos());
            ea += delta;
            if delta.abs() < KEPLER_TOLERANCE {
                return Ok(between_0_tau(ea));
            }
        }

        KeplerNonConvergenceSnafu {
            iterations: KEPLER_MAX_ITER,
        }
        .fail()
    }

    /// Returns the true anomaly in radians, within [0, 2 pi).
    pub fn true_anomaly(&self) -> Result<f64, AstroError> {
        let ea = self.eccentric_anomaly()?;
        let ta = ((1.0 - self.ecc.powi(2)).sqrt() * ea.sin()).atan2(ea.cos() - self.ecc);
        Ok(between_0_tau(ta))
    }

    /// Returns the unit vectors of the perifocal frame: toward periapsis (P), 90 degrees ahead in the orbit plane (Q), and along the orbit normal (W).
    pub fn perifocal_basis(&self) -> (Vector3<f64>, Vector3<f64>, Vector3<f64>) {
        let (s_raan, c_raan) = self.raan_rad.sin_cos();
        let (s_aop, c_aop) = self.aop_rad.sin_cos();
        let (s_inc, c_inc) = self.inc_rad.sin_cos();

        let p_hat = Vector3::new(
            c_raan * c_aop - s_raan * s_aop * c_inc,
            s_raan * c_aop + c_raan * s_aop * c_inc,
            s_aop * s_inc,
        );
        let q_hat = Vector3::new(
            -c_raan * s_aop - s_raan * c_aop * c_inc,
            -s_raan * s_aop + c_raan * c_aop * c_inc,
            c_aop * s_inc,
        );
        let w_hat = Vector3::new(s_raan * s_inc, -c_raan * s_inc, c_inc);

        (p_hat, q_hat, w_hat)
    }

    /// Builds the inertial state corresponding to these elements at the provided epoch.
    pub fn to_state(&self, epoch: Epoch, mu_km3_s2: f64) -> Result<InertialState, AstroError> {
        ensure!(
            self.sma_km > 0.0 && (0.0..1.0).contains(&self.ecc),
            DegenerateOrbitSnafu {
                action: "building a state from the classical elements of an open orbit"
            }
        );
        let ta = self.true_anomaly()?;
        let (s_ta, c_ta) = ta.sin_cos();
        let p = self.sma_km * (1.0 - self.ecc.powi(2));
        let rmag = p / (1.0 + self.ecc * c_ta);
        let vel_scale = (mu_km3_s2 / p).sqrt();

        let (p_hat, q_hat, _) = self.perifocal_basis();
        let radius = rmag * c_ta * p_hat + rmag * s_ta * q_hat;
        let velocity = -vel_scale * s_ta * p_hat + vel_scale * (self.ecc + c_ta) * q_hat;

        Ok(InertialState::new(epoch, radius, velocity))
    }

    /// Returns the mean motion in radians per second
    pub fn mean_motion_rad_s(&self, mu_km3_s2: f64) -> f64 {
        (mu_km3_s2 / self.sma_km.powi(3)).sqrt()
    }

    /// Returns the orbital period in seconds
    pub fn period_s(&self, mu_km3_s2: f64) -> f64 {
        TAU / self.mean_motion_rad_s(mu_km3_s2)
    }
}

impl fmt::Display for ClassicalElements {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "sma = {:.6} km\tecc = {:.6}\tinc = {:.6} deg\traan = {:.6} deg\taop = {:.6} deg\tma = {:.6} deg",
            self.sma_km,
            self.ecc,
            self.inc_rad.to_degrees(),
            self.raan_rad.to_degrees(),
            self.aop_rad.to_degrees(),
            self.ma_rad.to_degrees()
        )
    }
}
