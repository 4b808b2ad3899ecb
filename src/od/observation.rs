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

use crate::io::{epoch_from_str, epoch_to_str, ConfigRepr};
use crate::linalg::{Matrix3, Vector3};
use crate::time::Epoch;
use crate::TimeTagged;
use serde_derive::{Deserialize, Serialize};
use std::fmt;

use super::{DegenerateMeasurementSnafu, ODError};
use snafu::ensure;

/// Position of the deputy in the Hill frame of the chief, with the one sigma error of the range
/// along the line of sight, in km.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PositionObservation {
    #[serde(serialize_with = "epoch_to_str", deserialize_with = "epoch_from_str")]
    pub epoch: Epoch,
    pub position_km: Vector3<f64>,
    pub range_error_km: f64,
}

impl ConfigRepr for PositionObservation {}

impl PositionObservation {
    pub fn new(epoch: Epoch, position_km: Vector3<f64>, range_error_km: f64) -> Self {
        Self {
            epoch,
            position_km,
            range_error_km,
        }
    }

    /// Measurement noise of this observation: the range error is mapped onto each axis through the direction cosines of the line of sight.
    pub fn noise(&self) -> Result<Matrix3<f64>, ODError> {
        let range_km = self.position_km.norm();
        ensure!(
            range_km > 0.0 && range_km.is_finite(),
            DegenerateMeasurementSnafu {
                reason: "zero measured position"
            }
        );
        ensure!(
            self.range_error_km >= 0.0 && self.range_error_km.is_finite(),
            DegenerateMeasurementSnafu {
                reason: "negative range error"
            }
        );

        let direction = self.position_km / range_km;
        Ok(Matrix3::from_diagonal(
            &direction.map(|cosine| (cosine * self.range_error_km).powi(2)),
        ))
    }
}

impl TimeTagged for PositionObservation {
    fn epoch(&self) -> Epoch {
        self.epoch
    }

    fn set_epoch(&mut self, epoch: Epoch) {
        self.epoch = epoch
    }
}

impl fmt::Display for PositionObservation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}: [{:.6}, {:.6}, {:.6}] km (range error = {} km)",
            self.epoch,
            self.position_km.x,
            self.position_km.y,
            self.position_km.z,
            self.range_error_km
        )
    }
}
