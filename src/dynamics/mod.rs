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

use crate::cosmic::{AstroError, InertialState};
use crate::linalg::{Vector3, Vector6};
use snafu::Snafu;
use std::fmt;

/// Cartesian-based orbital dynamics around the Earth, in the GCRF frame.
pub mod orbital;
pub use self::orbital::*;

/// Solar radiation pressure models.
pub mod solarpressure;
pub use self::solarpressure::*;

/// Spherical harmonic gravity models.
///
/// Supports coefficients loaded from fixed column text files, and the embedded EGM2008 coefficients.
pub mod sph_harmonics;
pub use self::sph_harmonics::*;

/// Finite burns with mass depletion.
pub mod propulsion;
pub use self::propulsion::*;

/// A trait for models with equations of motion that can be integrated.
pub trait Dynamics: Clone + Sync + Send {
    /// Returns the time derivative of the state, i.e. its velocity followed by its acceleration.
    ///
    /// The thrust acceleration of the provided state is applied as is.
    fn eom(&self, state: &InertialState) -> Result<Vector6<f64>, DynamicsError>;
}

/// A trait for immutable dynamics that return an acceleration (e.g. spherical harmonics, third bodies).
pub trait AccelModel: Send + Sync + fmt::Display {
    /// Defines the equations of motion for this acceleration model, in km/s^2 in the inertial frame.
    fn eom(&self, osc: &InertialState) -> Result<Vector3<f64>, DynamicsError>;
}

/// Dynamical model errors.
#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DynamicsError {
    /// Fuel exhausted.
    #[snafu(display(
        "fuel exhausted after {elapsed_s} s of burn at {mass_flow_kg_s} kg/s from {initial_mass_kg} kg"
    ))]
    FuelExhausted {
        mass_flow_kg_s: f64,
        elapsed_s: f64,
        initial_mass_kg: f64,
    },
    /// The finite burn parameters are not physical.
    #[snafu(display("invalid finite burn: {reason}"))]
    InvalidBurn { reason: &'static str },
    /// Astrodynamics error.
    #[snafu(display("dynamical model encountered an astro error: {source}"))]
    DynamicsAstro { source: AstroError },
}
