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

use serde_derive::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Earth orientation parameters of a given day (or interpolated between two days).
///
/// Angles are in radians and the UT1-UTC offset is in seconds.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EopRecord {
    pub mjd_utc: f64,
    pub ut1_utc_s: f64,
    pub x_pole_rad: f64,
    pub y_pole_rad: f64,
    pub dpsi_rad: f64,
    pub deps_rad: f64,
}

impl EopRecord {
    /// A record with all offsets set to zero, used when no EOP data is loaded.
    pub fn zero(mjd_utc: f64) -> Self {
        Self {
            mjd_utc,
            ..Default::default()
        }
    }

    fn lerp(&self, next: &Self, frac: f64, mjd_utc: f64) -> Self {
        let interp = |a: f64, b: f64| a + frac * (b - a);
        Self {
            mjd_utc,
            ut1_utc_s: interp(self.ut1_utc_s, next.ut1_utc_s),
            x_pole_rad: interp(self.x_pole_rad, next.x_pole_rad),
            y_pole_rad: interp(self.y_pole_rad, next.y_pole_rad),
            dpsi_rad: interp(self.dpsi_rad, next.dpsi_rad),
            deps_rad: interp(self.deps_rad, next.deps_rad),
        }
    }
}

/// Daily Earth orientation records, keyed by their whole MJD (UTC).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EopTable {
    records: BTreeMap<i64, EopRecord>,
}

impl EopTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from the provided records. Later records replace earlier ones on the same day.
    pub fn from_records<I: IntoIterator<Item = EopRecord>>(records: I) -> Self {
        let mut me = Self::new();
        for record in records {
            me.insert(record);
        }
        me
    }

    pub fn insert(&mut self, record: EopRecord) {
        self.records.insert(record.mjd_utc.floor() as i64, record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the first and last day covered by this table, if any.
    pub fn coverage(&self) -> Option<(i64, i64)> {
        let first = self.records.keys().next()?;
        let last = self.records.keys().next_back()?;
        Some((*first, *last))
    }

    /// Returns the record at the provided MJD (UTC).
    ///
    /// Linearly interpolates between the two records surrounding this date. Before (resp. after)
    /// the coverage of the table, the first (resp. last) record is returned. An empty table
    /// returns all zero offsets.
    pub fn at(&self, mjd_utc: f64) -> EopRecord {
        let (first, last) = match (
            self.records.iter().next(),
            self.records.iter().next_back(),
        ) {
            (Some(first), Some(last)) => (first, last),
            _ => return EopRecord::zero(mjd_utc),
        };

        if mjd_utc < *first.0 as f64 {
            trace!("MJD {mjd_utc} before EOP coverage, clamping to {}", first.0);
            return EopRecord {
                mjd_utc,
                ..*first.1
            };
        } else if mjd_utc >= *last.0 as f64 {
            if mjd_utc > *last.0 as f64 + 1.0 {
                trace!("MJD {mjd_utc} after EOP coverage, clamping to {}", last.0);
            }
            return EopRecord {
                mjd_utc,
                ..*last.1
            };
        }

        let day = mjd_utc.floor() as i64;
        let lower = self.records.range(..=day).next_back();
        let upper = self.records.range(day + 1..).next();
        match (lower, upper) {
            (Some((lo_mjd, lo)), Some((hi_mjd, hi))) => {
                let frac = (mjd_utc - *lo_mjd as f64) / ((hi_mjd - lo_mjd) as f64);
                lo.lerp(hi, frac, mjd_utc)
            }
            (Some((_, lo)), None) => EopRecord { mjd_utc, ..*lo },
            (None, Some((_, hi))) => EopRecord { mjd_utc, ..*hi },
            (None, None) => EopRecord::zero(mjd_utc),
        }
    }
}
