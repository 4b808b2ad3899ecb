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
use crate::dynamics::DynamicsError;
use crate::io::{ConfigError, InputOutputError};
use crate::od::ODError;
use crate::propagators::PropagationError;
use snafu::prelude::*;

/// Crate level error, wrapping the error of each module so that a driving loop can use a single `?`.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum RelnavError {
    #[snafu(display("astrodynamics error: {source}"))]
    Astro { source: AstroError },
    #[snafu(display("dynamics error: {source}"))]
    Dynamics { source: DynamicsError },
    #[snafu(display("propagation error: {source}"))]
    Propagation { source: PropagationError },
    #[snafu(display("orbit determination error: {source}"))]
    OrbitDetermination { source: ODError },
    #[snafu(display("configuration error: {source}"))]
    Config { source: ConfigError },
    #[snafu(display("input/output error: {source}"))]
    InputOutput { source: InputOutputError },
}

impl From<AstroError> for RelnavError {
    fn from(source: AstroError) -> Self {
        Self::Astro { source }
    }
}

impl From<DynamicsError> for RelnavError {
    fn from(source: DynamicsError) -> Self {
        Self::Dynamics { source }
    }
}

impl From<PropagationError> for RelnavError {
    fn from(source: PropagationError) -> Self {
        Self::Propagation { source }
    }
}

impl From<ODError> for RelnavError {
    fn from(source: ODError) -> Self {
        Self::OrbitDetermination { source }
    }
}

impl From<ConfigError> for RelnavError {
    fn from(source: ConfigError) -> Self {
        Self::Config { source }
    }
}

impl From<InputOutputError> for RelnavError {
    fn from(source: InputOutputError) -> Self {
        Self::InputOutput { source }
    }
}
