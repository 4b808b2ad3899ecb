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

use super::{MissingMeasurementSnafu, ODAstroSnafu, ODConfigSnafu, ODError, PositionObservation};
use crate::cosmic::{HillState, InertialState};
use crate::io::{ConfigError, ConfigRepr};
use crate::linalg::{Matrix3x6, Matrix6, Matrix6x3, Vector6};
use crate::propagators::HillPropagator;
use crate::time::Epoch;
use crate::utils::adjugate_inverse;
use serde_derive::{Deserialize, Serialize};
use snafu::{OptionExt, ResultExt};
use std::fmt;
use typed_builder::TypedBuilder;

fn default_initial_covariance() -> [f64; 6] {
    [0.5, 0.5, 0.5, 5e-4, 5e-4, 5e-4]
}

fn default_process_noise() -> [f64; 6] {
    [1e-9; 6]
}

/// Diagonals of the initial covariance and of the process noise of the relative Kalman filter,
/// in km^2 for the position components and km^2/s^2 for the velocity ones.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize, TypedBuilder)]
pub struct KalmanConfig {
    #[builder(default = default_initial_covariance())]
    #[serde(default = "default_initial_covariance")]
    pub initial_covariance_diag: [f64; 6],
    #[builder(default = default_process_noise())]
    #[serde(default = "default_process_noise")]
    pub process_noise_diag: [f64; 6],
}

impl Default for KalmanConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ConfigRepr for KalmanConfig {}

impl KalmanConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, diag) in [
            ("initial covariance", &self.initial_covariance_diag),
            ("process noise", &self.process_noise_diag),
        ] {
            if diag.iter().any(|v| !v.is_finite() || *v < 0.0) {
                return Err(ConfigError::InvalidConfig {
                    msg: format!("{name} diagonal must be non-negative, got {diag:?}"),
                });
            }
        }
        Ok(())
    }
}

/// Linear Kalman filter of the Hill state of a deputy, with position observations.
///
/// The estimate is the state of the inner [HillPropagator], so the CW propagator always continues from the
/// latest estimate. The predicted state and covariance overwrite the estimate until the next update.
#[derive(Clone, Debug)]
pub struct RelativeKalman {
    pub propagator: HillPropagator,
    pub covariance: Matrix6<f64>,
    pub process_noise: Matrix6<f64>,
    /// State transition matrix of the latest prediction
    pub stm: Matrix6<f64>,
    /// Epoch of the latest update
    pub epoch: Epoch,
    measurement: Option<PositionObservation>,
}

impl RelativeKalman {
    pub fn new(
        epoch: Epoch,
        propagator: HillPropagator,
        config: &KalmanConfig,
    ) -> Result<Self, ODError> {
        config.validate().context(ODConfigSnafu)?;
        Ok(Self {
            propagator,
            covariance: Matrix6::from_diagonal(&Vector6::from_row_slice(
                &config.initial_covariance_diag,
            )),
            process_noise: Matrix6::from_diagonal(&Vector6::from_row_slice(
                &config.process_noise_diag,
            )),
            stm: Matrix6::identity(),
            epoch,
            measurement: None,
        })
    }

    /// Rebuilds a filter from its covariances, with the identity as the state transition matrix.
    pub(crate) fn from_parts(
        epoch: Epoch,
        propagator: HillPropagator,
        covariance: Matrix6<f64>,
        process_noise: Matrix6<f64>,
    ) -> Self {
        Self {
            propagator,
            covariance,
            process_noise,
            stm: Matrix6::identity(),
            epoch,
            measurement: None,
        }
    }

    /// Initializes the filter at the epoch of the chief, with the Hill state of the deputy as the first estimate.
    pub fn from_inertial(
        chief: &InertialState,
        deputy: &InertialState,
        mu_km3_s2: f64,
        config: &KalmanConfig,
    ) -> Result<Self, ODError> {
        let propagator =
            HillPropagator::from_inertial(chief, deputy, mu_km3_s2).context(ODAstroSnafu)?;
        Self::new(chief.epoch, propagator, config)
    }

    pub fn estimate(&self) -> HillState {
        self.propagator.state
    }

    /// Sensitivity of the observation to the state: the position is observed directly.
    pub fn sensitivity() -> Matrix3x6<f64> {
        Matrix3x6::identity()
    }

    pub fn set_measurement(&mut self, obs: PositionObservation) {
        self.measurement = Some(obs);
    }

    pub fn measurement(&self) -> Option<&PositionObservation> {
        self.measurement.as_ref()
    }

    /// Time update over `dt_s` seconds, which may be negative.
    pub fn predict(&mut self, dt_s: f64) {
        self.stm = self.propagator.system_matrix(dt_s);
        self.propagator.step_by_seconds(dt_s);
        self.covariance = self.stm * self.covariance * self.stm.transpose() + self.process_noise;
    }

    /// Computes the Kalman gain of the current measurement from the current (predicted) covariance.
    pub fn gain(&self) -> Result<Matrix6x3<f64>, ODError> {
        let obs = self.measurement.context(MissingMeasurementSnafu {
            action: "computing the gain",
        })?;
        let h_tilde = Self::sensitivity();
        let innovation_covar = h_tilde * self.covariance * h_tilde.transpose() + obs.noise()?;
        let inverse = adjugate_inverse(&innovation_covar).ok_or(ODError::SingularKalmanGain)?;

        Ok(self.covariance * h_tilde.transpose() * inverse)
    }

    /// Measurement update with the current measurement. The covariance uses the Joseph form.
    pub fn update(&mut self) -> Result<HillState, ODError> {
        let obs = self.measurement.context(MissingMeasurementSnafu {
            action: "updating the estimate",
        })?;
        let noise = obs.noise()?;
        let gain = self.gain()?;
        let h_tilde = Self::sensitivity();

        let state_bar = self.propagator.state.to_vector();
        let innovation = obs.position_km - h_tilde * state_bar;
        let state_hat = state_bar + gain * innovation;

        let i_kh = Matrix6::identity() - gain * h_tilde;
        self.covariance =
            i_kh * self.covariance * i_kh.transpose() + gain * noise * gain.transpose();

        debug!(
            "{}: innovation {:.6} km, correction {:.6} km",
            obs.epoch,
            innovation.norm(),
            (gain * innovation).fixed_rows::<3>(0).norm()
        );

        self.propagator.state = HillState::from_vector(&state_hat);
        Ok(self.propagator.state)
    }

    /// Processes an observation: predicts to its epoch then updates the estimate with it.
    pub fn process(&mut self, obs: &PositionObservation) -> Result<HillState, ODError> {
        let dt_s = (obs.epoch - self.epoch).to_seconds();
        if dt_s < 0.0 {
            warn!(
                "observation at {} precedes the filter epoch {}",
                obs.epoch, self.epoch
            );
        }
        self.set_measurement(*obs);
        self.predict(dt_s);
        self.epoch = obs.epoch;
        let estimate = self.update()?;

        debug!(
            "{}: position sigmas [{:.3e}, {:.3e}, {:.3e}] km",
            self.epoch,
            self.covariance[(0, 0)].sqrt(),
            self.covariance[(1, 1)].sqrt(),
            self.covariance[(2, 2)].sqrt()
        );

        Ok(estimate)
    }
}

impl fmt::Display for RelativeKalman {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.epoch, self.propagator.state)
    }
}
