//! In-force state of a model point during the decrement pass

use crate::policy::ModelPoint;
use super::cashflows::DecrementRow;

/// State of a model point at month t
#[derive(Debug, Clone)]
pub struct ProjectionState {
    /// Current projection month (0-indexed)
    pub t: u32,

    /// Duration in force in whole years
    pub duration: u32,

    /// Attained age
    pub age: u32,

    /// Policies in force at the start of month t
    pub pols_if: f64,

    /// Policies maturing at month t (non-zero only at the maturity month)
    pub pols_maturity: f64,

    /// Month at which the remaining policies mature
    pub maturity_month: u32,
}

impl ProjectionState {
    /// Initialize state at t = 0 with the given number of policies
    pub fn from_model_point(point: &ModelPoint, pols_if_init: f64) -> Self {
        Self {
            t: 0,
            duration: 0,
            age: point.age_at_entry,
            pols_if: pols_if_init,
            pols_maturity: 0.0,
            maturity_month: point.maturity_month(),
        }
    }

    /// Whether the state has reached the final projected month
    pub fn at_maturity(&self) -> bool {
        self.t >= self.maturity_month
    }

    /// Advance to t + 1 after the decrements of month t
    ///
    /// Survivors of deaths and lapses stay in force, except at the maturity
    /// month where they all mature and nothing remains in force.
    pub fn advance_month(&mut self, point: &ModelPoint, row: &DecrementRow) {
        self.t += 1;
        self.duration = point.duration(self.t);
        self.age = point.age(self.t);

        let survivors = row.pols_if - row.pols_lapse - row.pols_death;

        if self.t == self.maturity_month {
            self.pols_maturity = survivors;
            self.pols_if = 0.0;
        } else if self.t > self.maturity_month {
            self.pols_maturity = 0.0;
            self.pols_if = 0.0;
        } else {
            self.pols_maturity = 0.0;
            self.pols_if = survivors;
        }
    }
}
