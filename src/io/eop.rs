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

use super::{columns, read_to_string, EmptyTableSnafu, InputOutputError, ParseFieldSnafu};
use crate::cosmic::{EopRecord, EopTable, ARCSEC_TO_RAD};
use snafu::{ensure, OptionExt};
use std::path::Path;
use std::str::FromStr;

// Zero-indexed column ranges of the IERS finals (Bulletin A) format
const MJD_COLS: (usize, usize) = (7, 12);
const PM_X_COLS: (usize, usize) = (18, 27);
const PM_Y_COLS: (usize, usize) = (37, 46);
const UT1_UTC_COLS: (usize, usize) = (58, 68);
const DPSI_COLS: (usize, usize) = (97, 106);
const DEPS_COLS: (usize, usize) = (116, 125);

const MILLIARCSEC_TO_RAD: f64 = ARCSEC_TO_RAD * 1e-3;

impl EopTable {
    /// Parses the IERS finals data (one day per line).
    ///
    /// Reading stops at the first line which does not include the nutation corrections, i.e. the start of the predictions.
    pub fn from_finals_str(data: &str) -> Result<Self, InputOutputError> {
        let mut table = Self::new();
        for (lno, line) in data.lines().enumerate() {
            if line.trim_end().len() < DEPS_COLS.1 {
                break;
            }

            let field = |cols: (usize, usize), field: &'static str| -> Result<f64, InputOutputError> {
                columns(line, cols.0, cols.1)
                    .and_then(|item| f64::from_str(item).ok())
                    .context(ParseFieldSnafu {
                        line: lno + 1,
                        field,
                    })
            };

            let mjd = columns(line, MJD_COLS.0, MJD_COLS.1)
                .and_then(|item| i64::from_str(item).ok())
                .context(ParseFieldSnafu {
                    line: lno + 1,
                    field: "MJD",
                })?;

            table.insert(EopRecord {
                mjd_utc: mjd as f64,
                ut1_utc_s: field(UT1_UTC_COLS, "UT1-UTC")?,
                x_pole_rad: field(PM_X_COLS, "PM-x")? * ARCSEC_TO_RAD,
                y_pole_rad: field(PM_Y_COLS, "PM-y")? * ARCSEC_TO_RAD,
                dpsi_rad: field(DPSI_COLS, "dPsi")? * MILLIARCSEC_TO_RAD,
                deps_rad: field(DEPS_COLS, "dEpsilon")? * MILLIARCSEC_TO_RAD,
            });
        }

        ensure!(
            !table.is_empty(),
            EmptyTableSnafu {
                what: "finals EOP data"
            }
        );

        Ok(table)
    }

    /// Loads the IERS finals file from the path, which may be gunzipped.
    pub fn from_finals_file<P: AsRef<Path>>(
        path: P,
        gunzipped: bool,
    ) -> Result<Self, InputOutputError> {
        let name = path.as_ref().display().to_string();
        let table = Self::from_finals_str(&read_to_string(path, gunzipped)?)?;
        if let Some((first, last)) = table.coverage() {
            info!(
                "{name} loaded with {} EOP records from MJD {first} to {last}",
                table.len()
            );
        }
        Ok(table)
    }
}
