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

use crate::cosmic::{to_hill, AstroError, HillState, InertialState};
use crate::linalg::Matrix6;
use crate::time::{Duration, Unit};
use std::fmt;

/// Clohessy-Wiltshire propagation of a relative state in the Hill frame of a chief on a circular orbit.
///
/// This linear model is only valid for separations small compared to the orbit radius of the chief.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HillPropagator {
    pub state: HillState,
    /// Mean motion of the chief, in rad/s
    pub mean_motion_rad_s: f64,
    /// Step used by [Self::step], defaults to 10 minutes
    pub step_size: Duration,
}

impl HillPropagator {
    /// Initializes the propagator from the semi-major axis of the chief.
    pub fn new(state: HillState, chief_sma_km: f64, mu_km3_s2: f64) -> Self {
        Self::from_mean_motion(state, (mu_km3_s2 / chief_sma_km.powi(3)).sqrt())
    }

    pub fn from_mean_motion(state: HillState, mean_motion_rad_s: f64) -> Self {
        Self {
            state,
            mean_motion_rad_s,
            step_size: 10 * Unit::Minute,
        }
    }

    /// Initializes the propagator with the Hill state of the deputy relative to the chief, using the osculating semi-major axis of the chief.
    pub fn from_inertial(
        chief: &InertialState,
        deputy: &InertialState,
        mu_km3_s2: f64,
    ) -> Result<Self, AstroError> {
        Ok(Self::new(
            to_hill(chief, deputy)?,
            chief.sma_km(mu_km3_s2)?,
            mu_km3_s2,
        ))
    }

    pub fn mean_motion(&self) -> f64 {
        self.mean_motion_rad_s
    }

    /// Returns the Clohessy-Wiltshire state transition matrix over `dt_s` seconds (which may be negative).
    pub fn system_matrix(&self, dt_s: f64) -> Matrix6<f64> {
        let n = self.mean_motion_rad_s;
        let nt = n * dt_s;
        let (s, c) = nt.sin_cos();

        Matrix6::new(
            4.0 - 3.0 * c,
            0.0,
            0.0,
            s / n,
            2.0 * (1.0 - c) / n,
            0.0,
            // In-track
            6.0 * (s - nt),
            1.0,
            0.0,
            -2.0 * (1.0 - c) / n,
            (4.0 * s - 3.0 * nt) / n,
            0.0,
            // Cross-track
            0.0,
            0.0,
            c,
            0.0,
            0.0,
            s / n,
            // Radial rate
            3.0 * n * s,
            0.0,
            0.0,
            c,
            2.0 * s,
            0.0,
            // In-track rate
            -6.0 * n * (1.0 - c),
            0.0,
            0.0,
            -2.0 * s,
            4.0 * c - 3.0,
            0.0,
            // Cross-track rate
            0.0,
            0.0,
            -n * s,
            0.0,
            0.0,
            c,
        )
    }

    /// Propagates the relative state by `dt_s` seconds and returns the new state.
    pub fn step_by_seconds(&mut self, dt_s: f64) -> HillState {
        self.state = HillState::from_vector(&(self.system_matrix(dt_s) * self.state.to_vector()));
        self.state
    }

    /// Propagates the relative state by the step size and returns the new state.
    pub fn step(&mut self) -> HillState {
        self.step_by_seconds(self.step_size.to_seconds())
    }
}

impl fmt::Display for HillPropagator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "CW propagator (n = {:e} rad/s, step = {})\t{}",
            self.mean_motion_rad_s, self.step_size, self.state
        )
    }
}
