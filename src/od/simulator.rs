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

use super::{ODAstroSnafu, ODError, PositionObservation, WhiteNoise};
use crate::cosmic::{to_hill, HillState, InertialState};
use crate::linalg::Vector3;
use crate::time::Epoch;
use crate::utils::normalize;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;
use snafu::ResultExt;

/// Simulates noisy position observations of a deputy from the chief.
///
/// The range along the line of sight is perturbed by a white noise of the range error, and the line of
/// sight itself is tilted by a white noise of the pointing error about a random axis perpendicular to it.
#[derive(Clone, Debug)]
pub struct PositionObsSimulator {
    pub range_noise: WhiteNoise,
    pub pointing_noise: WhiteNoise,
    rng: Pcg64Mcg,
}

impl PositionObsSimulator {
    /// Initializes a simulator, seeded so that its observations are reproducible.
    pub fn new(seed: u64, range_error_km: f64, pointing_error_rad: f64) -> Result<Self, ODError> {
        Ok(Self {
            range_noise: WhiteNoise::new(range_error_km)?,
            pointing_noise: WhiteNoise::new(pointing_error_rad)?,
            rng: Pcg64Mcg::seed_from_u64(seed),
        })
    }

    /// Observes the provided relative state at this epoch.
    pub fn observe(
        &mut self,
        epoch: Epoch,
        truth: &HillState,
    ) -> Result<PositionObservation, ODError> {
        let los = normalize(&truth.radius_km, "observing a deputy at the chief")
            .context(ODAstroSnafu)?;
        let range_km = truth.radius_km.norm() + self.range_noise.sample(&mut self.rng);

        let los = if self.pointing_noise.sigma > 0.0 {
            // Any direction, projected onto the plane perpendicular to the line of sight
            let draw: Vector3<f64> = Vector3::new(
                self.rng.sample(rand_distr::StandardNormal),
                self.rng.sample(rand_distr::StandardNormal),
                self.rng.sample(rand_distr::StandardNormal),
            );
            let axis = normalize(&(draw - draw.dot(&los) * los), "drawing a pointing axis")
                .context(ODAstroSnafu)?;
            let (s, c) = self.pointing_noise.sample(&mut self.rng).sin_cos();
            c * los + s * axis.cross(&los)
        } else {
            los
        };

        Ok(PositionObservation::new(
            epoch,
            range_km * los,
            self.range_noise.sigma,
        ))
    }

    /// Observes the deputy in the Hill frame of the chief, at the epoch of the chief.
    pub fn observe_inertial(
        &mut self,
        chief: &InertialState,
        deputy: &InertialState,
    ) -> Result<PositionObservation, ODError> {
        let truth = to_hill(chief, deputy).context(ODAstroSnafu)?;
        self.observe(chief.epoch, &truth)
    }
}
