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

use super::{AccelModel, Dynamics, DynamicsAstroSnafu, DynamicsError, Harmonics, SolarPressure};
use crate::cosmic::ephemerides::{moon_position, sun_position};
use crate::cosmic::{
    EarthOrientation, InertialState, EARTH_MU_KM3_S2, MOON_MU_KM3_S2, SUN_MU_KM3_S2,
};
use crate::io::gravity::GeopotentialModel;
use crate::io::{ConfigError, ConfigRepr};
use crate::linalg::{Vector3, Vector6};
use crate::time::Epoch;
use crate::utils::normalize;
use serde_derive::{Deserialize, Serialize};
use snafu::ResultExt;
use std::fmt;
use std::sync::Arc;
use typed_builder::TypedBuilder;

/// Selects which perturbations are added on top of the point mass Earth.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(doc)]
pub struct ForceModelConfig {
    /// Include the third body perturbations of the Moon and the Sun
    #[builder(default = true)]
    #[serde(default = "default_true")]
    pub luni_solar: bool,
    /// Coefficient of reflectivity times area over mass, in m^2/kg. Zero disables SRP.
    #[builder(default = 0.0)]
    #[serde(default)]
    pub srp_scalar_m2_kg: f64,
    /// Degree and order of the geopotential. Below 2, only the point mass is used.
    #[builder(default = default_degree())]
    #[serde(default = "default_degree")]
    pub geopotential_degree: usize,
}

fn default_true() -> bool {
    true
}

fn default_degree() -> usize {
    4
}

impl Default for ForceModelConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ConfigRepr for ForceModelConfig {}

impl ForceModelConfig {
    /// Only the point mass Earth.
    pub fn two_body() -> Self {
        Self {
            luni_solar: false,
            srp_scalar_m2_kg: 0.0,
            geopotential_degree: 0,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.srp_scalar_m2_kg.is_finite() || self.srp_scalar_m2_kg < 0.0 {
            return Err(ConfigError::InvalidConfig {
                msg: format!(
                    "SRP scalar must be a non-negative number, got {}",
                    self.srp_scalar_m2_kg
                ),
            });
        }
        Ok(())
    }
}

/// `OrbitalDynamics` provides the equations of motion of a spacecraft around the Earth.
///
/// The acceleration is accumulated as the thrust of the state, then each acceleration model
/// in order, and finally the point mass gravity of the Earth, which is always included.
#[derive(Clone)]
pub struct OrbitalDynamics {
    pub mu_km3_s2: f64,
    pub accel_models: Vec<Arc<dyn AccelModel>>,
}

impl OrbitalDynamics {
    /// Initializes an OrbitalDynamics which only includes the point mass Earth.
    pub fn two_body() -> Self {
        Self::new(vec![])
    }

    /// Initialize orbital dynamics with a list of acceleration models
    pub fn new(accel_models: Vec<Arc<dyn AccelModel>>) -> Self {
        Self {
            mu_km3_s2: EARTH_MU_KM3_S2,
            accel_models,
        }
    }

    /// Initialize new orbital mechanics with the provided model.
    /// **Note:** Orbital dynamics _always_ include two body dynamics, these cannot be turned off.
    pub fn with_model(accel_model: Arc<dyn AccelModel>) -> Self {
        Self::new(vec![accel_model])
    }

    /// Add a model to the currently defined orbital dynamics
    pub fn add_model(&mut self, accel_model: Arc<dyn AccelModel>) {
        self.accel_models.push(accel_model);
    }

    /// Builds the full force model: Moon, then Sun, then SRP, then the geopotential, on top of the point mass Earth.
    ///
    /// The geopotential and Earth orientation are shared read-only between all the dynamics built from them.
    pub fn from_config(
        cfg: &ForceModelConfig,
        geopotential: Arc<GeopotentialModel>,
        orientation: Arc<EarthOrientation>,
    ) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let mut me = Self::two_body();
        me.mu_km3_s2 = geopotential.mu_km3_s2;
        if cfg.luni_solar {
            me.add_model(ThirdBody::moon());
            me.add_model(ThirdBody::sun());
        }
        if cfg.srp_scalar_m2_kg > 0.0 {
            me.add_model(SolarPressure::new(cfg.srp_scalar_m2_kg));
        }
        if cfg.geopotential_degree >= 2 {
            me.add_model(Harmonics::new(
                geopotential,
                orientation,
                cfg.geopotential_degree,
            ));
        }
        Ok(me)
    }
}

impl fmt::Display for OrbitalDynamics {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let models: Vec<String> = self.accel_models.iter().map(|x| format!("{x}")).collect();
        write!(
            f,
            "Orbital dynamics (mu = {} km^3/s^2) with {} models: {:?}",
            self.mu_km3_s2,
            self.accel_models.len(),
            models
        )
    }
}

impl Dynamics for OrbitalDynamics {
    fn eom(&self, state: &InertialState) -> Result<Vector6<f64>, DynamicsError> {
        let r_hat = normalize(&state.radius_km, "computing the point mass gravity")
            .context(DynamicsAstroSnafu)?;

        let mut accel = state.thrust_km_s2;
        for model in &self.accel_models {
            accel += model.eom(state)?;
        }
        accel += -self.mu_km3_s2 / state.rmag_km().powi(2) * r_hat;

        Ok(Vector6::from_iterator(
            state
                .velocity_km_s
                .iter()
                .chain(accel.iter())
                .cloned(),
        ))
    }
}

/// Differential gravity of a third body, whose position relative to the Earth is given by an analytical ephemeris.
pub struct ThirdBody {
    pub name: &'static str,
    pub mu_km3_s2: f64,
    ephem: fn(Epoch) -> Vector3<f64>,
}

impl ThirdBody {
    pub fn new(name: &'static str, mu_km3_s2: f64, ephem: fn(Epoch) -> Vector3<f64>) -> Arc<Self> {
        Arc::new(Self {
            name,
            mu_km3_s2,
            ephem,
        })
    }

    pub fn moon() -> Arc<Self> {
        Self::new("Moon", MOON_MU_KM3_S2, moon_position)
    }

    pub fn sun() -> Arc<Self> {
        Self::new("Sun", SUN_MU_KM3_S2, sun_position)
    }
}

impl fmt::Display for ThirdBody {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} third body (mu = {} km^3/s^2)", self.name, self.mu_km3_s2)
    }
}

impl AccelModel for ThirdBody {
    fn eom(&self, osc: &InertialState) -> Result<Vector3<f64>, DynamicsError> {
        // Third body as seen from the Earth, and as seen from the spacecraft
        let earth_to_body = (self.ephem)(osc.epoch);
        let sc_to_body = earth_to_body - osc.radius_km;
        let sc_dist = sc_to_body.norm();
        let earth_dist = earth_to_body.norm();
        if sc_dist == 0.0 || earth_dist == 0.0 {
            return Err(DynamicsError::DynamicsAstro {
                source: crate::cosmic::AstroError::ZeroMagnitude {
                    action: "computing a third body perturbation",
                },
            });
        }

        Ok(self.mu_km3_s2 * (sc_to_body / sc_dist.powi(3) - earth_to_body / earth_dist.powi(3)))
    }
}
