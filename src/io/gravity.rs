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

use super::{columns, read_to_string, InputOutputError, ParseFieldSnafu};
use crate::cosmic::{EARTH_EQUATORIAL_RADIUS_KM, EARTH_FLATTENING, EARTH_MU_KM3_S2};
use snafu::OptionExt;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

// Zero-indexed layout of the coefficient files
const MU_LINE: usize = 4;
const RADIUS_LINE: usize = 5;
const FLATTENING_LINE: usize = 6;
const HEADER_VALUE_COLS: (usize, usize) = (18, 38);
const FIRST_COEFFICIENT_LINE: usize = 13;
const DEGREE_COLS: (usize, usize) = (7, 10);
const ORDER_COLS: (usize, usize) = (12, 15);
const C_COLS: (usize, usize) = (17, 37);
const S_COLS: (usize, usize) = (37, 57);

/// Fully normalized spherical harmonic coefficients of a central body, with its gravitational
/// parameter (km^3/s^2), equatorial radius (km) and flattening.
///
/// The C and S tables are triangular: row `n` holds the orders `0..=n`. This is immutable once
/// loaded and is typically shared as an `Arc<GeopotentialModel>`.
#[derive(Clone, Debug, PartialEq)]
pub struct GeopotentialModel {
    pub name: String,
    pub mu_km3_s2: f64,
    pub radius_km: f64,
    pub flattening: f64,
    c_nm: Vec<Vec<f64>>,
    s_nm: Vec<Vec<f64>>,
}

impl GeopotentialModel {
    /// Builds a model from coefficient tables, padding missing orders with zeros.
    pub fn from_tables(
        name: &str,
        mu_km3_s2: f64,
        radius_km: f64,
        flattening: f64,
        c_nm: &[&[f64]],
        s_nm: &[&[f64]],
    ) -> Self {
        let mut me = Self::empty(name, mu_km3_s2, radius_km, flattening);
        for (n, (c_row, s_row)) in c_nm.iter().zip(s_nm.iter()).enumerate() {
            for m in 0..=n {
                me.set(
                    n,
                    m,
                    c_row.get(m).copied().unwrap_or(0.0),
                    s_row.get(m).copied().unwrap_or(0.0),
                );
            }
        }
        me
    }

    fn empty(name: &str, mu_km3_s2: f64, radius_km: f64, flattening: f64) -> Self {
        Self {
            name: name.to_string(),
            mu_km3_s2,
            radius_km,
            flattening,
            c_nm: vec![vec![1.0], vec![0.0, 0.0]],
            s_nm: vec![vec![0.0], vec![0.0, 0.0]],
        }
    }

    fn set(&mut self, degree: usize, order: usize, c: f64, s: f64) {
        while self.c_nm.len() <= degree {
            let len = self.c_nm.len();
            self.c_nm.push(vec![0.0; len + 1]);
            self.s_nm.push(vec![0.0; len + 1]);
        }
        self.c_nm[degree][order] = c;
        self.s_nm[degree][order] = s;
    }

    /// Earth EGM2008 normalized coefficients up to degree and order 4.
    pub fn egm2008_4x4() -> Self {
        Self::from_tables(
            "EGM2008",
            EARTH_MU_KM3_S2,
            EARTH_EQUATORIAL_RADIUS_KM,
            EARTH_FLATTENING,
            &[
                &[1.0],
                &[0.0, 0.0],
                &[
                    -0.484_165_143_790_815e-3,
                    -0.206_615_509_074_176e-9,
                    0.243_938_357_328_313e-5,
                ],
                &[
                    0.957_161_207_093_473e-6,
                    0.203_046_201_047_864e-5,
                    0.904_787_894_809_528e-6,
                    0.721_321_757_121_568e-6,
                ],
                &[
                    0.539_965_866_638_991e-6,
                    -0.536_157_389_388_867e-6,
                    0.350_501_623_962_649e-6,
                    0.990_856_766_672_321e-6,
                    -0.188_519_633_023_033e-6,
                ],
            ],
            &[
                &[0.0],
                &[0.0, 0.0],
                &[0.0, 0.138_441_389_137_979e-8, -0.140_027_370_385_934e-5],
                &[
                    0.0,
                    0.248_200_415_856_872e-6,
                    -0.619_005_475_177_618e-6,
                    0.141_434_926_192_941e-5,
                ],
                &[
                    0.0,
                    -0.473_567_346_518_086e-6,
                    0.662_480_026_275_829e-6,
                    -0.200_956_723_567_452e-6,
                    0.308_803_882_149_194e-6,
                ],
            ],
        )
    }

    /// Earth J<sub>2</sub> only, from the EGM2008 model.
    pub fn j2_only() -> Self {
        let mut me = Self::empty(
            "EGM2008 J2",
            EARTH_MU_KM3_S2,
            EARTH_EQUATORIAL_RADIUS_KM,
            EARTH_FLATTENING,
        );
        me.set(2, 0, -0.484_165_143_790_815e-3, 0.0);
        me
    }

    /// Parses a fixed column coefficient file, keeping the coefficients up to `max_degree` inclusive.
    ///
    /// Lines 5, 6 and 7 hold the gravitational parameter, the radius and the flattening in columns 19 to 38.
    /// From line 14 onward, each line holds the degree (columns 8-10), the order (13-15), C (18-37) and S (38-57).
    /// Exponents may use `D` as in Fortran output.
    pub fn parse(name: &str, data: &str, max_degree: usize) -> Result<Self, InputOutputError> {
        let lines: Vec<&str> = data.lines().collect();

        let header = |lno: usize, field: &'static str| -> Result<f64, InputOutputError> {
            lines
                .get(lno)
                .and_then(|line| columns(line, HEADER_VALUE_COLS.0, HEADER_VALUE_COLS.1))
                .and_then(parse_float)
                .context(ParseFieldSnafu {
                    line: lno + 1,
                    field,
                })
        };

        let mut me = Self::empty(
            name,
            header(MU_LINE, "gravitational parameter")?,
            header(RADIUS_LINE, "equatorial radius")?,
            header(FLATTENING_LINE, "flattening")?,
        );

        for (lno, line) in lines.iter().enumerate().skip(FIRST_COEFFICIENT_LINE) {
            if line.trim().is_empty() {
                continue;
            }
            let field = |cols: (usize, usize), field: &'static str| {
                columns(line, cols.0, cols.1).context(ParseFieldSnafu {
                    line: lno + 1,
                    field,
                })
            };

            let degree = usize::from_str(field(DEGREE_COLS, "degree")?)
                .ok()
                .context(ParseFieldSnafu {
                    line: lno + 1,
                    field: "degree",
                })?;
            if degree > max_degree {
                // The file is sorted by degree, so we can stop reading.
                break;
            }
            let order = usize::from_str(field(ORDER_COLS, "order")?)
                .ok()
                .filter(|order| *order <= degree)
                .context(ParseFieldSnafu {
                    line: lno + 1,
                    field: "order",
                })?;
            let c = parse_float(field(C_COLS, "C coefficient")?).context(ParseFieldSnafu {
                line: lno + 1,
                field: "C coefficient",
            })?;
            let s = parse_float(field(S_COLS, "S coefficient")?).context(ParseFieldSnafu {
                line: lno + 1,
                field: "S coefficient",
            })?;

            me.set(degree, order, c, s);
        }

        if me.max_degree() < max_degree {
            warn!(
                "{name} only contained degree {} instead of requested {max_degree}",
                me.max_degree()
            );
        } else {
            info!("{name} loaded with degree and order {max_degree}");
        }

        Ok(me)
    }

    /// Loads the coefficient file from the path, which may be gunzipped.
    pub fn from_file<P: AsRef<Path>>(
        path: P,
        max_degree: usize,
        gunzipped: bool,
    ) -> Result<Self, InputOutputError> {
        let name = path.as_ref().display().to_string();
        let data = read_to_string(path, gunzipped)?;
        Self::parse(&name, &data, max_degree)
    }

    /// Maximum degree (and order) of the coefficients available.
    pub fn max_degree(&self) -> usize {
        self.c_nm.len() - 1
    }

    /// Returns the normalized C<sub>nm</sub> and S<sub>nm</sub> coefficients, or zeros if not loaded.
    pub fn cs_nm(&self, degree: usize, order: usize) -> (f64, f64) {
        match (
            self.c_nm.get(degree).and_then(|row| row.get(order)),
            self.s_nm.get(degree).and_then(|row| row.get(order)),
        ) {
            (Some(c), Some(s)) => (*c, *s),
            _ => (0.0, 0.0),
        }
    }
}

impl fmt::Display for GeopotentialModel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {}x{} (mu = {} km^3/s^2, radius = {} km)",
            self.name,
            self.max_degree(),
            self.max_degree(),
            self.mu_km3_s2,
            self.radius_km
        )
    }
}

fn parse_float(item: &str) -> Option<f64> {
    f64::from_str(&item.replace(['D', 'd'], "E")).ok()
}
