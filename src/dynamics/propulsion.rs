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

use super::{DynamicsAstroSnafu, DynamicsError, InvalidBurnSnafu};
use crate::cosmic::STD_GRAVITY;
use crate::linalg::Vector3;
use crate::utils::normalize;
use serde_derive::{Deserialize, Serialize};
use snafu::{ensure, ResultExt};
use std::fmt;

/// A constant thrust, constant mass flow burn along a fixed inertial direction.
///
/// The mass decreases linearly from the initial mass during the burn, so the thrust acceleration increases.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FiniteBurn {
    /// Unit vector of the thrust in the inertial frame
    pub direction: Vector3<f64>,
    /// in kg/s
    pub mass_flow_kg_s: f64,
    /// Mass at the start of the burn, in kg
    pub initial_mass_kg: f64,
    /// Specific impulse, in seconds
    pub isp_s: f64,
}

impl FiniteBurn {
    /// Initializes a new finite burn, normalizing the direction.
    pub fn new(
        direction: Vector3<f64>,
        mass_flow_kg_s: f64,
        initial_mass_kg: f64,
        isp_s: f64,
    ) -> Result<Self, DynamicsError> {
        let direction =
            normalize(&direction, "normalizing the burn direction").context(DynamicsAstroSnafu)?;
        ensure!(
            mass_flow_kg_s.is_finite() && mass_flow_kg_s >= 0.0,
            InvalidBurnSnafu {
                reason: "mass flow must be non-negative"
            }
        );
        ensure!(
            initial_mass_kg.is_finite() && initial_mass_kg > 0.0,
            InvalidBurnSnafu {
                reason: "initial mass must be positive"
            }
        );
        ensure!(
            isp_s.is_finite() && isp_s > 0.0,
            InvalidBurnSnafu {
                reason: "specific impulse must be positive"
            }
        );

        Ok(Self {
            direction,
            mass_flow_kg_s,
            initial_mass_kg,
            isp_s,
        })
    }

    /// Thrust of the engine in N.
    pub fn thrust_n(&self) -> f64 {
        self.mass_flow_kg_s * self.isp_s * STD_GRAVITY
    }

    /// Mass after this many seconds of burn, in kg.
    pub fn mass_at(&self, elapsed_s: f64) -> f64 {
        self.initial_mass_kg - self.mass_flow_kg_s * elapsed_s
    }

    /// Burn duration which exhausts the whole initial mass.
    pub fn max_duration_s(&self) -> f64 {
        if self.mass_flow_kg_s > 0.0 {
            self.initial_mass_kg / self.mass_flow_kg_s
        } else {
            f64::INFINITY
        }
    }

    /// Delta-v imparted after this many seconds of burn, in km/s (rocket equation).
    pub fn delta_v_km_s(&self, elapsed_s: f64) -> Result<f64, DynamicsError> {
        self.check_fuel(elapsed_s)?;
        let exhaust_km_s = self.isp_s * STD_GRAVITY * 1e-3;
        Ok(exhaust_km_s * (self.initial_mass_kg / self.mass_at(elapsed_s)).ln())
    }

    fn check_fuel(&self, elapsed_s: f64) -> Result<(), DynamicsError> {
        if self.mass_flow_kg_s * elapsed_s >= self.initial_mass_kg {
            Err(DynamicsError::FuelExhausted {
                mass_flow_kg_s: self.mass_flow_kg_s,
                elapsed_s,
                initial_mass_kg: self.initial_mass_kg,
            })
        } else {
            Ok(())
        }
    }

    /// Thrust acceleration in km/s^2 after this many seconds of burn.
    ///
    /// At the start of the burn this is the thrust over the initial mass. Afterwards, the delta-v of the rocket
    /// equation is divided by the equivalent burn time `-ln(m(t)/m0) * m(t) / mdot`, which equals the thrust over
    /// the current mass.
    pub fn acceleration_at(&self, elapsed_s: f64) -> Result<Vector3<f64>, DynamicsError> {
        if self.mass_flow_kg_s == 0.0 {
            return Ok(Vector3::zeros());
        }
        self.check_fuel(elapsed_s)?;

        // Thrust in kg km/s^2
        let thrust = self.thrust_n() * 1e-3;

        if elapsed_s == 0.0 {
            return Ok(self.direction * (thrust / self.initial_mass_kg));
        }

        let ln_ratio = (1.0 - self.mass_flow_kg_s * elapsed_s / self.initial_mass_kg).ln();
        let mass_kg = self.mass_at(elapsed_s);
        let dv = (-thrust / self.mass_flow_kg_s) * ln_ratio;

        Ok(self.direction * (dv * (self.mass_flow_kg_s / mass_kg) / (-ln_ratio)))
    }
}

impl fmt::Display for FiniteBurn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "burn along [{:.6}, {:.6}, {:.6}] at {} kg/s from {} kg (Isp = {} s)",
            self.direction.x,
            self.direction.y,
            self.direction.z,
            self.mass_flow_kg_s,
            self.initial_mass_kg,
            self.isp_s
        )
    }
}
