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

use super::{DynamicsSnafu, IntegrationDetails, PropConfigSnafu, PropagationError, Propagator};
use crate::cosmic::InertialState;
use crate::dynamics::{Dynamics, DynamicsError, FiniteBurn};
use crate::linalg::Vector6;
use crate::time::{Duration, Epoch, Unit};
use snafu::ResultExt;
use std::time::Instant;

/// A propagator instance holds the state being propagated, and the finite burn in progress if any.
pub struct PropInstance<'a, D: Dynamics> {
    /// The state of this propagator instance
    pub state: InertialState,
    /// The propagator setup (kind, stages, etc.)
    pub prop: &'a Propagator<D>,
    /// Stores the details of the previous integration step
    pub details: IntegrationDetails,
    pub(crate) step_size: Duration,
    // Burn in progress, restarted from its initial mass at every step
    pub(crate) burn: Option<FiniteBurn>,
    // Allows us to do pre-allocation of the ki vectors
    pub(crate) k: Vec<Vector6<f64>>,
}

impl<'a, D: Dynamics> PropInstance<'a, D> {
    /// Allows setting the step size of the propagator for subsequent calls to [Self::step].
    pub fn set_step(&mut self, step_size: Duration) {
        self.step_size = step_size;
    }

    /// Takes a single step of the current step size (negative steps propagate backward). Returns the new state.
    pub fn step(&mut self) -> Result<InertialState, PropagationError> {
        self.single_step()?;
        self.details.steps = 1;
        Ok(self.state)
    }

    /// Propagates until exactly the provided epoch, which may be before the current epoch.
    ///
    /// The span is split into the smallest number of equal steps which do not exceed the maximum step.
    /// The step size used by [Self::step] is left unchanged.
    pub fn step_to_epoch(&mut self, target: Epoch) -> Result<InertialState, PropagationError> {
        self.prop.opts.validate().context(PropConfigSnafu)?;

        let duration = target - self.state.epoch;
        let dt_s = duration.to_seconds();
        let num_steps = self.num_steps(dt_s);
        self.details.steps = 0;
        if num_steps == 0 {
            return Ok(self.state);
        }

        let tick = Instant::now();
        let log_progress = duration.abs() >= 2 * Unit::Minute;
        if log_progress {
            // Prevent the print spam for orbit determination cases
            info!("Propagating for {} until {}", duration, target);
        }

        let prev_step_size = self.step_size;
        self.step_size = (dt_s / num_steps as f64) * Unit::Second;
        let rslt = (0..num_steps).try_for_each(|_| self.single_step());
        // Restore the step size for subsequent calls
        self.step_size = prev_step_size;
        rslt?;

        // Each step is rounded to the nanosecond, so snap onto the requested epoch
        self.state.epoch = target;
        self.details.steps = num_steps;

        if log_progress {
            let tock: Duration = tick.elapsed().into();
            info!("Done in {}", tock);
        }

        Ok(self.state)
    }

    /// This method propagates the provided Dynamics for the provided duration.
    pub fn for_duration(&mut self, duration: Duration) -> Result<InertialState, PropagationError> {
        self.step_to_epoch(self.state.epoch + duration)
    }

    /// Propagates for the provided duration while applying the finite burn, then stops thrusting.
    ///
    /// Within each integration step, the thrust of every stage is evaluated at the elapsed time of that stage
    /// since the start of the step, from the initial mass of the burn.
    pub fn maneuver(
        &mut self,
        burn: FiniteBurn,
        duration: Duration,
    ) -> Result<InertialState, PropagationError> {
        let duration_s = duration.to_seconds();
        if duration_s < 0.0 {
            return Err(PropagationError::Dynamics {
                source: DynamicsError::InvalidBurn {
                    reason: "burn duration must be non-negative",
                },
            });
        }
        self.prop.opts.validate().context(PropConfigSnafu)?;
        let num_steps = self.num_steps(duration_s);
        if num_steps == 0 {
            return Ok(self.state);
        }
        // The last stage of each step is the most demanding one
        let step_s = duration_s / num_steps as f64;
        let dv_per_step_km_s = burn.delta_v_km_s(step_s).context(DynamicsSnafu)?;

        info!("Starting {burn} for {duration}");
        self.burn = Some(burn);
        let rslt = self.for_duration(duration);
        self.burn = None;

        let end = rslt?;
        info!(
            "Burn completed at {}: {:.6} km/s imparted over {num_steps} steps",
            end.epoch,
            dv_per_step_km_s * num_steps as f64
        );
        Ok(end)
    }

    /// Take a single propagator step
    pub(crate) fn single_step(&mut self) -> Result<(), PropagationError> {
        let next_state = self.derive()?;
        self.state.set(self.state.epoch + self.step_size, &next_state);
        self.details.step = self.step_size;
        Ok(())
    }

    /// Number of equal steps, none longer than the maximum step, spanning this many seconds.
    fn num_steps(&self, dt_s: f64) -> usize {
        (dt_s.abs() / self.prop.opts.max_step.to_seconds()).ceil() as usize
    }

    /// Evaluates the dynamics at this offset from the start of the current step. The thrust of the burn in
    /// progress, if any, is evaluated at that offset.
    fn eom_at(&self, offset_s: f64, pos_vel: &Vector6<f64>) -> Result<Vector6<f64>, PropagationError> {
        let mut ctx = InertialState::from_vector(self.state.epoch + offset_s * Unit::Second, pos_vel);
        ctx.thrust_km_s2 = match &self.burn {
            Some(burn) => burn.acceleration_at(offset_s).context(DynamicsSnafu)?,
            None => self.state.thrust_km_s2,
        };
        self.prop.dynamics.eom(&ctx).context(DynamicsSnafu)
    }

    /// This method integrates the dynamics over the current step size. Everything passed to this function is in **seconds**.
    ///
    /// This function returns the new state as y_{n+1} = y_n + h \sum_i b_i k_i.
    fn derive(&mut self) -> Result<Vector6<f64>, PropagationError> {
        let state_vec = self.state.to_vector();
        let step_size = self.step_size.to_seconds();
        let a_coeffs = self.prop.a_coeffs();

        let ki = self.eom_at(0.0, &state_vec)?;
        self.k[0] = ki;
        let mut a_idx: usize = 0;
        for i in 0..(self.prop.stages() - 1) {
            // Let's compute the c_i by summing the relevant items from the list of coefficients.
            // \sum_{j=1}^{i-1} a_ij  ∀ i ∈ [2, s]
            let mut ci: f64 = 0.0;
            // The wi stores the a_{s1} * k_1 + a_{s2} * k_2 + ... + a_{s, s-1} * k_{s-1} +
            let mut wi = Vector6::zeros();
            for kj in &self.k[0..i + 1] {
                let a_ij = a_coeffs[a_idx];
                ci += a_ij;
                wi += a_ij * kj;
                a_idx += 1;
            }

            let ki = self.eom_at(ci * step_size, &(state_vec + step_size * wi))?;
            self.k[i + 1] = ki;
        }

        let mut next_state = state_vec;
        for (ki, b_i) in self.k.iter().zip(self.prop.b_coeffs()) {
            next_state += step_size * b_i * ki;
        }
        Ok(next_state)
    }

    /// Copy the details of the latest integration step.
    pub fn latest_details(&self) -> IntegrationDetails {
        self.details
    }
}
