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

use super::{AccelModel, DynamicsError};
use crate::cosmic::{AstroError, EarthOrientation, InertialState};
use crate::io::gravity::GeopotentialModel;
use crate::linalg::{DMatrix, Vector3};
use std::fmt;
use std::sync::Arc;

/// Non-spherical gravity of the Earth from fully normalized coefficients, computed in the Earth fixed frame.
///
/// The zonal terms of degree zero and one are never included: the point mass is handled by the orbital dynamics.
pub struct Harmonics {
    model: Arc<GeopotentialModel>,
    orientation: Arc<EarthOrientation>,
    degree: usize,
    a_nm: DMatrix<f64>,
    b_nm: DMatrix<f64>,
    vr01: DMatrix<f64>,
}

impl Harmonics {
    /// Create a new Harmonics dynamical model up to the requested degree and order.
    ///
    /// The degree is capped to what the geopotential model provides.
    pub fn new(
        model: Arc<GeopotentialModel>,
        orientation: Arc<EarthOrientation>,
        degree: usize,
    ) -> Arc<Self> {
        let degree = if degree > model.max_degree() {
            warn!(
                "requested degree {degree} but {} only has degree {}",
                model.name,
                model.max_degree()
            );
            model.max_degree()
        } else {
            degree
        };

        let mut a_nm = DMatrix::from_element(degree + 1, degree + 1, 0.0);
        let mut b_nm = DMatrix::from_element(degree + 1, degree + 1, 0.0);
        let mut vr01 = DMatrix::from_element(degree + 1, degree + 1, 0.0);

        for n in 0..=degree {
            let nf64 = n as f64;
            for m in 0..=n {
                let mf64 = m as f64;
                if n >= m + 2 {
                    a_nm[(n, m)] = (((2.0 * nf64 + 1.0) * (2.0 * nf64 - 1.0))
                        / ((nf64 - mf64) * (nf64 + mf64)))
                        .sqrt();
                    b_nm[(n, m)] = (((2.0 * nf64 + 1.0) * (nf64 + mf64 - 1.0)
                        * (nf64 - mf64 - 1.0))
                        / ((nf64 - mf64) * (nf64 + mf64) * (2.0 * nf64 - 3.0)))
                        .sqrt();
                }

                vr01[(n, m)] = ((nf64 - mf64) * (nf64 + mf64 + 1.0)).sqrt();
                if m == 0 {
                    vr01[(n, m)] /= 2.0_f64.sqrt();
                }
            }
        }

        Arc::new(Self {
            model,
            orientation,
            degree,
            a_nm,
            b_nm,
            vr01,
        })
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Fully normalized associated Legendre functions of the sine of the latitude.
    /// Rows are the degree, columns the order; one extra column of zeros is kept for the derivative.
    fn legendre(&self, sin_lat: f64, cos_lat: f64) -> DMatrix<f64> {
        self.legendre_seeded(sin_lat, cos_lat, 3.0_f64.sqrt() * cos_lat)
    }

    /// Same as [Self::legendre] divided by the cosine of the latitude, for orders of one and above.
    /// This remains finite on the polar axis.
    fn legendre_over_cos(&self, sin_lat: f64, cos_lat: f64) -> DMatrix<f64> {
        self.legendre_seeded(sin_lat, cos_lat, 3.0_f64.sqrt())
    }

    fn legendre_seeded(&self, sin_lat: f64, cos_lat: f64, p_11: f64) -> DMatrix<f64> {
        let max_n = self.degree;
        let mut p_nm = DMatrix::from_element(max_n + 1, max_n + 2, 0.0);
        p_nm[(0, 0)] = 1.0;

        for m in 1..=max_n {
            let mf64 = m as f64;
            p_nm[(m, m)] = if m == 1 {
                p_11
            } else {
                ((2.0 * mf64 + 1.0) / (2.0 * mf64)).sqrt() * cos_lat * p_nm[(m - 1, m - 1)]
            };
        }

        for m in 0..max_n {
            p_nm[(m + 1, m)] = (2.0 * m as f64 + 3.0).sqrt() * sin_lat * p_nm[(m, m)];
        }

        for m in 0..=max_n {
            for n in (m + 2)..=max_n {
                p_nm[(n, m)] =
                    self.a_nm[(n, m)] * sin_lat * p_nm[(n - 1, m)] - self.b_nm[(n, m)] * p_nm[(n - 2, m)];
            }
        }

        p_nm
    }

    /// Spherical coordinates (radius, sine and cosine of latitude, longitude) of an Earth fixed position.
    /// The longitude is zero on the polar axis.
    fn spherical(&self, r_itrf: &Vector3<f64>) -> Result<(f64, f64, f64, f64), DynamicsError> {
        let rmag = r_itrf.norm();
        if rmag == 0.0 || !rmag.is_finite() {
            return Err(DynamicsError::DynamicsAstro {
                source: AstroError::ZeroMagnitude {
                    action: "evaluating the geopotential",
                },
            });
        }
        Ok((
            rmag,
            r_itrf.z / rmag,
            r_itrf.x.hypot(r_itrf.y) / rmag,
            r_itrf.y.atan2(r_itrf.x),
        ))
    }

    /// Disturbing potential (excluding the point mass) at an Earth fixed position, in km^2/s^2.
    pub fn potential_itrf(&self, r_itrf: &Vector3<f64>) -> Result<f64, DynamicsError> {
        let (rmag, sin_lat, cos_lat, long) = self.spherical(r_itrf)?;
        let p_nm = self.legendre(sin_lat, cos_lat);
        let rho = self.model.radius_km / rmag;

        let mut potential = 0.0;
        for n in 2..=self.degree {
            let mut sum = 0.0;
            for m in 0..=n {
                let (c_nm, s_nm) = self.model.cs_nm(n, m);
                let (s_ml, c_ml) = (m as f64 * long).sin_cos();
                sum += p_nm[(n, m)] * (c_nm * c_ml + s_nm * s_ml);
            }
            potential += rho.powi(n as i32) * sum;
        }
        Ok(self.model.mu_km3_s2 / rmag * potential)
    }

    /// Acceleration from the partials of the disturbing potential, in the Earth fixed frame.
    ///
    /// The longitude partial is carried divided by the cosine of the latitude, so that the acceleration on the
    /// polar axis is the limit of the acceleration near it.
    pub fn acceleration_itrf(&self, r_itrf: &Vector3<f64>) -> Result<Vector3<f64>, DynamicsError> {
        let (rmag, sin_lat, cos_lat, long) = self.spherical(r_itrf)?;
        let p_nm = self.legendre(sin_lat, cos_lat);
        let q_nm = self.legendre_over_cos(sin_lat, cos_lat);
        let rho = self.model.radius_km / rmag;

        let mut du_dr = 0.0;
        let mut du_dlat = 0.0;
        // Partial with respect to the longitude, over the cosine of the latitude
        let mut du_dlong_sec = 0.0;

        for n in 2..=self.degree {
            let rho_n = rho.powi(n as i32);
            let mut sum_r = 0.0;
            let mut sum_lat = 0.0;
            let mut sum_long = 0.0;
            for m in 0..=n {
                let mf64 = m as f64;
                let (c_nm, s_nm) = self.model.cs_nm(n, m);
                let (s_ml, c_ml) = (mf64 * long).sin_cos();
                let cs_term = c_nm * c_ml + s_nm * s_ml;
                sum_r += p_nm[(n, m)] * cs_term;
                if m == 0 {
                    sum_lat += self.vr01[(n, m)] * p_nm[(n, m + 1)] * cs_term;
                } else {
                    let dp_nm = self.vr01[(n, m)] * p_nm[(n, m + 1)] - mf64 * sin_lat * q_nm[(n, m)];
                    sum_lat += dp_nm * cs_term;
                    sum_long += mf64 * q_nm[(n, m)] * (s_nm * c_ml - c_nm * s_ml);
                }
            }
            du_dr += rho_n * (n as f64 + 1.0) * sum_r;
            du_dlat += rho_n * sum_lat;
            du_dlong_sec += rho_n * sum_long;
        }

        let mu = self.model.mu_km3_s2;
        du_dr *= -mu / rmag.powi(2);
        du_dlat *= mu / rmag;
        du_dlong_sec *= mu / rmag;

        // Unit vectors of increasing latitude and longitude, scaled by the partials
        let (s_long, c_long) = long.sin_cos();
        let north = du_dlat / rmag;
        let east = du_dlong_sec / rmag;

        Ok(Vector3::new(
            du_dr * cos_lat * c_long - north * sin_lat * c_long - east * s_long,
            du_dr * cos_lat * s_long - north * sin_lat * s_long + east * c_long,
            du_dr * sin_lat + north * cos_lat,
        ))
    }
}

impl fmt::Display for Harmonics {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} gravity field {}x{}",
            self.model.name, self.degree, self.degree
        )
    }
}

impl AccelModel for Harmonics {
    fn eom(&self, osc: &InertialState) -> Result<Vector3<f64>, DynamicsError> {
        if self.degree < 2 {
            return Ok(Vector3::zeros());
        }
        // Get the DCM to convert from the integration frame to the Earth fixed frame
        let dcm = self.orientation.itrf_to_gcrf(osc.epoch);
        let r_itrf = dcm.transpose() * osc.radius_km;
        // Convert back to integration frame
        Ok(dcm * self.acceleration_itrf(&r_itrf)?)
    }
}
