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

/*! # relnav

Relative navigation toolkit for proximity operations around Earth: an inertial force model
(point mass, geopotential, luni-solar, solar radiation pressure and finite burns) integrated with a
fixed step RK4, the exact curvilinear Hill frame transform and the linear Clohessy-Wiltshire
propagator, and a Kalman filter estimating the relative state from position observations.
*/

/// Provides the RK4 propagator of inertial states and the linear Hill (CW) propagator.
pub mod propagators;

/// Provides the force models used for orbital mechanics, which can be combined.
pub mod dynamics;

/// Provides the inertial and relative states, the Earth orientation chain, and the Sun and Moon ephemerides.
pub mod cosmic;

/// Utility functions shared by different modules, and which may be useful to engineers.
pub mod utils;

mod errors;
/// Functions which may fail will return an error, and this crate does not panic.
pub use self::errors::RelnavError;

/// All the input/output needs for this library, including gravity potential files, EOP files and checkpoints.
pub mod io;

/// Relative orbit determination: observations, simulator and Kalman filter.
pub mod od;

#[macro_use]
extern crate log;
extern crate hifitime;
extern crate nalgebra as na;

/// Re-export of hifitime
pub mod time {
    pub use hifitime::*;
}

/// Re-export nalgebra
pub mod linalg {
    pub use na::base::*;
}

/// Re-export some useful things
pub use self::cosmic::{HillState, InertialState, TimeTagged};
