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

use super::{AccelModel, DynamicsAstroSnafu, DynamicsError};
use crate::cosmic::ephemerides::sun_position;
use crate::cosmic::{InertialState, AU, SOLAR_PRESSURE_AT_1AU};
use crate::linalg::Vector3;
use crate::utils::normalize;
use snafu::ResultExt;
use std::fmt;
use std::sync::Arc;

/// Cannonball solar radiation pressure, without eclipses.
///
/// The scalar is the coefficient of reflectivity times the area over the mass, in m^2/kg.
#[derive(Clone, Debug, PartialEq)]
pub struct SolarPressure {
    pub srp_scalar_m2_kg: f64,
}

impl SolarPressure {
    pub fn new(srp_scalar_m2_kg: f64) -> Arc<Self> {
        Arc::new(Self { srp_scalar_m2_kg })
    }
}

impl fmt::Display for SolarPressure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SRP with scalar {} m^2/kg", self.srp_scalar_m2_kg)
    }
}

impl AccelModel for SolarPressure {
    fn eom(&self, osc: &InertialState) -> Result<Vector3<f64>, DynamicsError> {
        let sun_to_sc = osc.radius_km - sun_position(osc.epoch);
        let dist_km = sun_to_sc.norm();
        let u_away = normalize(&sun_to_sc, "computing the solar radiation pressure")
            .context(DynamicsAstroSnafu)?;

        // Pressure in N/m^2 times m^2/kg is in m/s^2, hence the division by 1000 for km/s^2
        let accel_km_s2 =
            SOLAR_PRESSURE_AT_1AU * self.srp_scalar_m2_kg * (AU / dist_km).powi(2) / 1e3;

        Ok(accel_km_s2 * u_away)
    }
}
