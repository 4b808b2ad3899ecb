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

use rand::Rng;
use rand_distr::Normal;
use serde_derive::{Deserialize, Serialize};

use super::ODError;

/// White noise is an uncorrelated random variable.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WhiteNoise {
    /// Mean value of this white noise
    pub mean: f64,
    /// Noise as a one-sigma of the Normal distribution.
    pub sigma: f64,
}

impl WhiteNoise {
    /// Initializes a zero mean white noise, the sigma must be non-negative.
    pub fn new(sigma: f64) -> Result<Self, ODError> {
        if !sigma.is_finite() || sigma < 0.0 {
            return Err(ODError::InvalidNoise { sigma });
        }
        Ok(Self { mean: 0.0, sigma })
    }

    pub fn covariance(&self) -> f64 {
        self.sigma.powi(2)
    }

    /// Draws a sample of this noise. A noise whose sigma is invalid returns its mean.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        match Normal::new(self.mean, self.sigma) {
            Ok(normal) => rng.sample(normal),
            Err(_) => self.mean,
        }
    }
}
