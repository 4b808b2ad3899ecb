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

use super::{ConfigRepr, InputOutputError};
use crate::cosmic::{HillState, InertialState};
use crate::linalg::{Matrix6, Vector3};
use crate::od::RelativeKalman;
use crate::propagators::HillPropagator;
use crate::time::Epoch;
use serde_derive::{Deserialize, Serialize};

/// Snapshot of an inertial state, the epoch is stored as an MJD in UTC.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateCheckpoint {
    pub epoch_mjd_utc: f64,
    pub position_km: [f64; 3],
    pub velocity_km_s: [f64; 3],
}

impl ConfigRepr for StateCheckpoint {}

impl From<&InertialState> for StateCheckpoint {
    fn from(state: &InertialState) -> Self {
        Self {
            epoch_mjd_utc: state.epoch.to_mjd_utc_days(),
            position_km: state.radius_km.into(),
            velocity_km_s: state.velocity_km_s.into(),
        }
    }
}

impl From<&StateCheckpoint> for InertialState {
    fn from(ckpt: &StateCheckpoint) -> Self {
        InertialState::new(
            Epoch::from_mjd_utc(ckpt.epoch_mjd_utc),
            Vector3::from(ckpt.position_km),
            Vector3::from(ckpt.velocity_km_s),
        )
    }
}

/// Snapshot of a relative state in the Hill frame, at the epoch of its chief.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HillCheckpoint {
    pub epoch_mjd_utc: f64,
    pub position_km: [f64; 3],
    pub velocity_km_s: [f64; 3],
}

impl ConfigRepr for HillCheckpoint {}

impl HillCheckpoint {
    pub fn new(epoch: Epoch, state: &HillState) -> Self {
        Self {
            epoch_mjd_utc: epoch.to_mjd_utc_days(),
            position_km: state.radius_km.into(),
            velocity_km_s: state.velocity_km_s.into(),
        }
    }

    pub fn epoch(&self) -> Epoch {
        Epoch::from_mjd_utc(self.epoch_mjd_utc)
    }

    pub fn state(&self) -> HillState {
        HillState::new(
            Vector3::from(self.position_km),
            Vector3::from(self.velocity_km_s),
        )
    }
}

/// Snapshot of the relative Kalman filter. Both covariances are stored row-major.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterCheckpoint {
    pub estimate: HillCheckpoint,
    pub mean_motion_rad_s: f64,
    pub covariance: Vec<f64>,
    pub process_noise: Vec<f64>,
}

impl ConfigRepr for FilterCheckpoint {}

impl From<&RelativeKalman> for FilterCheckpoint {
    fn from(kf: &RelativeKalman) -> Self {
        Self {
            estimate: HillCheckpoint::new(kf.epoch, &kf.estimate()),
            mean_motion_rad_s: kf.propagator.mean_motion(),
            covariance: row_major(&kf.covariance),
            process_noise: row_major(&kf.process_noise),
        }
    }
}

impl FilterCheckpoint {
    /// Rebuilds the filter, without any pending measurement.
    pub fn to_filter(&self) -> Result<RelativeKalman, InputOutputError> {
        let covariance = from_row_major("covariance", &self.covariance)?;
        let process_noise = from_row_major("process noise", &self.process_noise)?;
        let propagator =
            HillPropagator::from_mean_motion(self.estimate.state(), self.mean_motion_rad_s);

        Ok(RelativeKalman::from_parts(
            self.estimate.epoch(),
            propagator,
            covariance,
            process_noise,
        ))
    }
}

fn row_major(m: &Matrix6<f64>) -> Vec<f64> {
    m.transpose().as_slice().to_vec()
}

fn from_row_major(what: &'static str, data: &[f64]) -> Result<Matrix6<f64>, InputOutputError> {
    if data.len() != 36 {
        return Err(InputOutputError::MalformedCheckpoint {
            what,
            expected: 36,
            got: data.len(),
        });
    }
    Ok(Matrix6::from_row_slice(data))
}
