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

use crate::time::{Duration, Epoch};
use snafu::Snafu;

/// A trait allowing for something to have an epoch
pub trait TimeTagged {
    /// Retrieve the Epoch
    fn epoch(&self) -> Epoch;
    /// Set the Epoch
    fn set_epoch(&mut self, epoch: Epoch);

    /// Shift this epoch by a duration (can be negative)
    fn shift_by(&mut self, duration: Duration) {
        self.set_epoch(self.epoch() + duration);
    }
}

#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum AstroError {
    #[snafu(display("degenerate orbit (zero angular momentum or not closed) when {action}"))]
    DegenerateOrbit { action: &'static str },
    #[snafu(display("zero magnitude vector when {action}"))]
    ZeroMagnitude { action: &'static str },
    #[snafu(display("Kepler's equation did not converge after {iterations} iterations"))]
    KeplerNonConvergence { iterations: usize },
    #[snafu(display("geodetic latitude did not converge after {iterations} iterations"))]
    GeodeticNonConvergence { iterations: usize },
    #[snafu(display("target steering requires the state of the target"))]
    MissingTarget,
}

// Re-Export the inertial state
mod state;
pub use self::state::*;

// Re-Export the Hill frame state and transforms
mod hill;
pub use self::hill::*;

/// Classical (Keplerian) orbital elements
pub mod elements;
pub use self::elements::ClassicalElements;

/// Earth orientation parameters and their interpolation
pub mod eop;
pub use self::eop::{EopRecord, EopTable};

/// Precession, nutation and rotation of the Earth, and geodetic conversions.
pub mod orientation;
pub use self::orientation::{EarthOrientation, Geodetic, TimeOffsets};

/// Low precision analytical ephemerides of the Sun and the Moon.
pub mod ephemerides;

/// Attitude steering laws (body axes from a state and an optional target)
pub mod attitude;

/// Gravitational parameter of the Earth in km^3/s^2 (EGM2008)
pub const EARTH_MU_KM3_S2: f64 = 398_600.441_8;
/// Equatorial radius of the Earth in km (WGS-84)
pub const EARTH_EQUATORIAL_RADIUS_KM: f64 = 6_378.137;
/// Flattening of the Earth (WGS-84)
pub const EARTH_FLATTENING: f64 = 1.0 / 298.257_223_563;
/// Gravitational parameter of the Sun in km^3/s^2
pub const SUN_MU_KM3_S2: f64 = 1.327_124_400_419e11;
/// Gravitational parameter of the Moon in km^3/s^2
pub const MOON_MU_KM3_S2: f64 = 4_902.800_305_555;
/// Astronomical unit, in kilometers, according to the [IAU](https://www.iau.org/public/themes/measuring/).
pub const AU: f64 = 149_597_870.700;
/// From NIST special publication 330, 2008 edition, in meters per second squared
pub const STD_GRAVITY: f64 = 9.80665;
/// Solar radiation pressure at 1 AU for a perfectly absorbing surface, in N/m^2
pub const SOLAR_PRESSURE_AT_1AU: f64 = 4.56e-6;
/// Terrestrial time is ahead of TAI by this many seconds
pub const TT_MINUS_TAI_S: f64 = 32.184;
/// Modified Julian Date of the J2000 reference epoch (2000-01-01T12:00:00 TT)
pub const MJD_J2000: f64 = 51_544.5;
/// Days in a Julian century
pub const DAYS_PER_CENTURY: f64 = 36_525.0;
/// Seconds per (ephemeris) day
pub const SECONDS_PER_DAY: f64 = 86_400.0;
/// Converts arc seconds to radians
pub const ARCSEC_TO_RAD: f64 = std::f64::consts::PI / 648_000.0;

/// Returns the number of Julian centuries past J2000 of this epoch, counted in Terrestrial Time.
pub fn julian_centuries_tt(epoch: Epoch) -> f64 {
    let mjd_tt = epoch.to_mjd_tai_days() + TT_MINUS_TAI_S / SECONDS_PER_DAY;
    (mjd_tt - MJD_J2000) / DAYS_PER_CENTURY
}

/// Panics with a readable message if the two states differ by more than the provided position or velocity tolerance.
pub fn assert_state_eq_or_abs(
    left: &InertialState,
    right: &InertialState,
    radial_tol_km: f64,
    velocity_tol_km_s: f64,
    msg: &str,
) {
    if !left.eq_within(right, radial_tol_km, velocity_tol_km_s) {
        panic!(
            r#"assertion failed: `(left == right)`
  left: `{left}`,
 right: `{right}`: {msg}"#,
        )
    }
}
