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

use super::{AstroError, DegenerateOrbitSnafu, TimeTagged};
use crate::linalg::{Vector3, Vector6};
use crate::time::Epoch;
use snafu::ensure;
use std::fmt;

/// Position and velocity of a spacecraft in the inertial (GCRF) frame, in km and km/s.
///
/// `thrust_km_s2` is transient: it is only non-zero while a finite burn is being integrated.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct InertialState {
    pub epoch: Epoch,
    pub radius_km: Vector3<f64>,
    pub velocity_km_s: Vector3<f64>,
    pub thrust_km_s2: Vector3<f64>,
}

impl InertialState {
    /// Creates a new state without any thrust.
    pub fn new(epoch: Epoch, radius_km: Vector3<f64>, velocity_km_s: Vector3<f64>) -> Self {
        Self {
            epoch,
            radius_km,
            velocity_km_s,
            thrust_km_s2: Vector3::zeros(),
        }
    }

    /// Creates a new state from its Cartesian components.
    #[allow(clippy::too_many_arguments)]
    pub fn cartesian(
        x_km: f64,
        y_km: f64,
        z_km: f64,
        vx_km_s: f64,
        vy_km_s: f64,
        vz_km_s: f64,
        epoch: Epoch,
    ) -> Self {
        Self::new(
            epoch,
            Vector3::new(x_km, y_km, z_km),
            Vector3::new(vx_km_s, vy_km_s, vz_km_s),
        )
    }

    /// Creates a new state from a position and velocity vector.
    pub fn from_vector(epoch: Epoch, pos_vel: &Vector6<f64>) -> Self {
        Self::new(
            epoch,
            pos_vel.fixed_rows::<3>(0).into_owned(),
            pos_vel.fixed_rows::<3>(3).into_owned(),
        )
    }

    /// Returns the position and velocity as a single vector.
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

    /// Sets the epoch, position and velocity of this state, keeping the thrust untouched.
    pub fn set(&mut self, epoch: Epoch, pos_vel: &Vector6<f64>) {
        self.epoch = epoch;
        self.radius_km = pos_vel.fixed_rows::<3>(0).into_owned();
        self.velocity_km_s = pos_vel.fixed_rows::<3>(3).into_owned();
    }

    /// Returns a copy of this state with the provided thrust acceleration.
    pub fn with_thrust(mut self, thrust_km_s2: Vector3<f64>) -> Self {
        self.thrust_km_s2 = thrust_km_s2;
        self
    }

    /// Returns the magnitude of the radius vector in km
    pub fn rmag_km(&self) -> f64 {
        self.radius_km.norm()
    }

    /// Returns the magnitude of the velocity vector in km/s
    pub fn vmag_km_s(&self) -> f64 {
        self.velocity_km_s.norm()
    }

    /// Returns the orbital momentum vector
    pub fn hvec(&self) -> Vector3<f64> {
        self.radius_km.cross(&self.velocity_km_s)
    }

    /// Returns the norm of the orbital momentum
    pub fn hmag(&self) -> f64 {
        self.hvec().norm()
    }

    /// Returns the specific mechanical energy in km^2/s^2
    pub fn energy_km2_s2(&self, mu_km3_s2: f64) -> f64 {
        self.vmag_km_s().powi(2) / 2.0 - mu_km3_s2 / self.rmag_km()
    }

    /// Returns the semi-major axis in km, computed from the vis-viva equation.
    pub fn sma_km(&self, mu_km3_s2: f64) -> Result<f64, AstroError> {
        let inv_sma = 2.0 / self.rmag_km() - self.vmag_km_s().powi(2) / mu_km3_s2;
        ensure!(
            inv_sma.is_finite() && inv_sma != 0.0,
            DegenerateOrbitSnafu {
                action: "computing the semi-major axis"
            }
        );
        Ok(1.0 / inv_sma)
    }

    /// Returns whether this state is within the provided position and velocity tolerances of the other state.
    /// Epochs must match exactly.
    pub fn eq_within(&self, other: &Self, radial_tol_km: f64, velocity_tol_km_s: f64) -> bool {
        self.epoch == other.epoch
            && (self.radius_km - other.radius_km).norm() <= radial_tol_km
            && (self.velocity_km_s - other.velocity_km_s).norm() <= velocity_tol_km_s
    }
}

impl TimeTagged for InertialState {
    fn epoch(&self) -> Epoch {
        self.epoch
    }

    fn set_epoch(&mut self, epoch: Epoch) {
        self.epoch = epoch
    }
}

impl fmt::Display for InertialState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[{}] position = [{:.6}, {:.6}, {:.6}] km\tvelocity = [{:.6}, {:.6}, {:.6}] km/s",
            self.epoch,
            self.radius_km.x,
            self.radius_km.y,
            self.radius_km.z,
            self.velocity_km_s.x,
            self.velocity_km_s.y,
            self.velocity_km_s.z
        )
    }
}
