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

use std::fmt;

use crate::io::{duration_from_str, duration_to_str, ConfigError, ConfigRepr};
use crate::time::{Duration, Unit};

use serde_derive::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// PropOpts stores the integrator options: the nominal step used by single steps, and the maximum
/// step allowed when propagating until an epoch.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(doc)]
pub struct PropOpts {
    #[builder(default_code = "300.0 * Unit::Second")]
    #[serde(
        serialize_with = "duration_to_str",
        deserialize_with = "duration_from_str",
        default = "default_step"
    )]
    pub step: Duration,
    #[builder(default_code = "300.0 * Unit::Second")]
    #[serde(
        serialize_with = "duration_to_str",
        deserialize_with = "duration_from_str",
        default = "default_step"
    )]
    pub max_step: Duration,
}

fn default_step() -> Duration {
    300.0 * Unit::Second
}

impl Default for PropOpts {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ConfigRepr for PropOpts {}

impl PropOpts {
    /// `with_fixed_step` initializes a `PropOpts` such that every step, including when propagating
    /// until an epoch, is at most the provided step.
    pub fn with_fixed_step(step: Duration) -> Self {
        Self {
            step,
            max_step: step.abs(),
        }
    }

    pub fn with_fixed_step_s(step: f64) -> Self {
        Self::with_fixed_step(step * Unit::Second)
    }

    /// Set the maximum step size and sets the nominal step to that value if currently greater
    pub fn set_max_step(&mut self, max_step: Duration) {
        if self.step.abs() > max_step {
            self.step = max_step;
        }
        self.max_step = max_step;
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_step <= Duration::ZERO {
            return Err(ConfigError::InvalidConfig {
                msg: format!("maximum step must be positive, got {}", self.max_step),
            });
        }
        if self.step == Duration::ZERO {
            return Err(ConfigError::InvalidConfig {
                msg: "step must be non-zero".to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for PropOpts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step: {}, max_step: {}", self.step, self.max_step)
    }
}
