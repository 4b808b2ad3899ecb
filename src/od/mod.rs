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

use crate::cosmic::AstroError;
use crate::io::ConfigError;
use snafu::prelude::Snafu;

/// Position observations of the deputy in the Hill frame of the chief.
pub mod observation;
pub use observation::PositionObservation;

/// Linear Kalman filter of the relative state, propagated with the Clohessy-Wiltshire model.
pub mod kalman;
pub use kalman::{KalmanConfig, RelativeKalman};

/// Provides noise modeling
pub mod noise;
pub use noise::WhiteNoise;

/// Provides the simulation of noisy position observations
pub mod simulator;
pub use simulator::PositionObsSimulator;

#[allow(unused_imports)]
pub mod prelude {
    pub use super::kalman::*;
    pub use super::noise::*;
    pub use super::observation::*;
    pub use super::simulator::*;
    pub use super::*;

    pub use crate::time::{Duration, Epoch, TimeUnits, Unit};
}

#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ODError {
    #[snafu(display("Kalman gain is singular"))]
    SingularKalmanGain,
    #[snafu(display("degenerate measurement: {reason}"))]
    DegenerateMeasurement { reason: &'static str },
    #[snafu(display("a measurement must be set before {action}"))]
    MissingMeasurement { action: &'static str },
    #[snafu(display("invalid noise: sigma = {sigma}"))]
    InvalidNoise { sigma: f64 },
    #[snafu(display("during an orbit determination, encountered {source}"))]
    ODAstro { source: AstroError },
    #[snafu(display("OD failed because {source}"))]
    ODConfigError { source: ConfigError },
}
