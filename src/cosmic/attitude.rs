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

use super::ephemerides::sun_position;
use super::{AstroError, InertialState, MissingTargetSnafu};
use crate::linalg::{Matrix3, Vector3};
use crate::utils::normalize;
use serde_derive::{Deserialize, Serialize};
use snafu::OptionExt;
use std::fmt;

/// Where the body X axis of the spacecraft is pointed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SteeringMode {
    /// X along the radial direction, Z along the orbit normal
    #[default]
    Lvlh,
    /// X toward the Sun, Z as close as possible to the orbit normal
    Solar,
    /// X toward the target, Z as close as possible to the orbit normal
    Target,
}

impl fmt::Display for SteeringMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Lvlh => write!(f, "LVLH"),
            Self::Solar => write!(f, "Solar"),
            Self::Target => write!(f, "Target"),
        }
    }
}

/// Builds a right handed orthonormal basis whose X axis is along `primary` and whose Z axis is
/// along `primary x secondary`. Returns the DCM from inertial to body (rows are the body axes).
fn two_vector_basis(
    primary: &Vector3<f64>,
    secondary: &Vector3<f64>,
) -> Result<Matrix3<f64>, AstroError> {
    let x_hat = normalize(primary, "normalizing the primary pointing vector")?;
    let z_hat = normalize(
        &x_hat.cross(secondary),
        "building a basis from colinear pointing vectors",
    )?;
    let y_hat = z_hat.cross(&x_hat);
    Ok(Matrix3::from_rows(&[
        x_hat.transpose(),
        y_hat.transpose(),
        z_hat.transpose(),
    ]))
}

/// Returns the DCM from the inertial frame to the body frame for the provided steering mode.
///
/// The target state is only required for [SteeringMode::Target] and is only read.
pub fn body_axes(
    mode: SteeringMode,
    state: &InertialState,
    target: Option<&InertialState>,
) -> Result<Matrix3<f64>, AstroError> {
    match mode {
        SteeringMode::Lvlh => {
            // Radial first, and the velocity as the secondary yields Z along the orbit normal.
            two_vector_basis(&state.radius_km, &state.velocity_km_s)
        }
        SteeringMode::Solar => {
            let to_sun = sun_position(state.epoch) - state.radius_km;
            two_vector_basis(&to_sun, &state.hvec().cross(&to_sun))
        }
        SteeringMode::Target => {
            let target = target.context(MissingTargetSnafu)?;
            let to_target = target.radius_km - state.radius_km;
            two_vector_basis(&to_target, &state.hvec().cross(&to_target))
        }
    }
}

/// Returns the unit vector from the spacecraft toward the target.
pub fn line_of_sight(
    state: &InertialState,
    target: Option<&InertialState>,
) -> Result<Vector3<f64>, AstroError> {
    let target = target.context(MissingTargetSnafu)?;
    normalize(
        &(target.radius_km - state.radius_km),
        "computing the line of sight to the target",
    )
}
