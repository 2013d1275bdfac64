//! Select and ultimate mortality table by attained age and duration
//!
//! Rates are annual. Durations 0 to 4 are select columns; duration 5 and
//! later all read the ultimate column.

use crate::error::{ProjectionError, Result};
use serde::{Deserialize, Serialize};

/// Number of select years; the column at this index is the ultimate rate
pub const SELECT_PERIOD: u32 = 5;

const COLUMNS: usize = SELECT_PERIOD as usize + 1;

/// Mortality rates indexed by attained age (rows) and duration (columns)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortalityTable {
    /// Attained age of the first row
    min_age: u32,

    /// Annual rates, one row per consecutive age starting at `min_age`
    rates: Vec<[f64; COLUMNS]>,
}

impl MortalityTable {
    /// Create from rows of consecutive ages starting at `min_age`
    pub fn new(min_age: u32, rates: Vec<[f64; COLUMNS]>) -> Result<Self> {
        if rates.is_empty() {
            return Err(ProjectionError::InvalidData("Mortality table is empty".into()));
        }
        for (i, row) in rates.iter().enumerate() {
            if let Some(q) = row.iter().find(|q| !(0.0..=1.0).contains(*q)) {
                return Err(ProjectionError::InvalidData(format!(
                    "Mortality rate {} at age {} is outside [0, 1]",
                    q,
                    min_age + i as u32
                )));
            }
        }
        Ok(Self { min_age, rates })
    }

    /// Sample select table for ages 18 to 120
    ///
    /// Makeham ultimate law `A + B * c^age` with A = 0.00019, B = 7.4e-6,
    /// c = 1.1, scaled by 1.1 per year of duration and capped at 1.
    /// Rounded to six places this gives 0.000231 at age 18, duration 0.
    pub fn sample_select_table() -> Self {
        let rates = (18..=120)
            .map(|age| {
                let base = 0.00019 + 7.4e-6 * 1.1_f64.powi(age);
                let mut row = [0.0; COLUMNS];
                for (d, q) in row.iter_mut().enumerate() {
                    *q = (base * 1.1_f64.powi(d as i32)).min(1.0);
                }
                row
            })
            .collect();

        Self { min_age: 18, rates }
    }

    pub fn min_age(&self) -> u32 {
        self.min_age
    }

    pub fn max_age(&self) -> u32 {
        self.min_age + self.rates.len() as u32 - 1
    }

    /// Annual mortality rate for an attained age and duration in years
    pub fn annual_rate(&self, age: u32, duration: u32) -> Result<f64> {
        let row = age
            .checked_sub(self.min_age)
            .and_then(|idx| self.rates.get(idx as usize))
            .ok_or_else(|| {
                ProjectionError::MissingAssumption(format!(
                    "No mortality rate for age {} (table covers {}-{})",
                    age,
                    self.min_age,
                    self.max_age()
                ))
            })?;

        Ok(row[duration.min(SELECT_PERIOD) as usize])
    }

    /// Monthly rate: q_monthly = 1 - (1 - q_annual)^(1/12)
    pub fn monthly_rate(&self, age: u32, duration: u32) -> Result<f64> {
        let q = self.annual_rate(age, duration)?;
        Ok(1.0 - (1.0 - q).powf(1.0 / 12.0))
    }

    /// Apply a multiplier to every rate, capping at 1
    pub fn scale(&mut self, multiplier: f64) {
        for row in &mut self.rates {
            for q in row.iter_mut() {
                *q = (*q * multiplier).min(1.0);
            }
        }
    }
}

impl Default for MortalityTable {
    fn default() -> Self {
        Self::sample_select_table()
    }
}
