//! Cashflow output structures for projections

use serde::{Deserialize, Serialize};

/// Relative tolerance of the present value self-check
pub const PV_CHECK_TOLERANCE: f64 = 1e-9;

/// Result column names, in output order
pub const RESULT_COLUMNS: [&str; 5] = ["Premiums", "Claims", "Expenses", "Commissions", "Net Cashflow"];

/// Policy counts and decrement rates for one month
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecrementRow {
    pub t: u32,
    pub duration: u32,
    pub age: u32,

    // Rates
    pub mort_rate_mth: f64,
    pub lapse_rate: f64,
    pub disc_factor: f64,

    // Policy counts
    pub pols_if: f64,
    pub pols_death: f64,
    pub pols_lapse: f64,
    pub pols_maturity: f64,
}

impl DecrementRow {
    pub fn new(t: u32) -> Self {
        Self {
            t,
            duration: 0,
            age: 0,
            mort_rate_mth: 0.0,
            lapse_rate: 0.0,
            disc_factor: 1.0,
            pols_if: 0.0,
            pols_death: 0.0,
            pols_lapse: 0.0,
            pols_maturity: 0.0,
        }
    }
}

/// Cashflows for the period from t to t + 1
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CashflowRow {
    pub t: u32,
    #[serde(rename = "Premiums")]
    pub premiums: f64,
    #[serde(rename = "Claims")]
    pub claims: f64,
    #[serde(rename = "Expenses")]
    pub expenses: f64,
    #[serde(rename = "Commissions")]
    pub commissions: f64,
    #[serde(rename = "Net Cashflow")]
    pub net_cf: f64,
}

impl CashflowRow {
    pub fn new(t: u32) -> Self {
        Self { t, ..Default::default() }
    }

    /// Add another row's amounts into this one
    pub fn accumulate(&mut self, other: &CashflowRow) {
        self.premiums += other.premiums;
        self.claims += other.claims;
        self.expenses += other.expenses;
        self.commissions += other.commissions;
        self.net_cf += other.net_cf;
    }
}

/// Present values at t = 0 of each projected stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PresentValues {
    pub premiums: f64,
    pub claims: f64,
    pub expenses: f64,
    pub commissions: f64,
    /// pv_premiums - pv_claims - pv_expenses - pv_commissions
    pub net_cf: f64,
    /// Annuity factor used for the net premium
    pub pols_if: f64,
}

impl PresentValues {
    /// Fill `net_cf` from the component present values
    pub fn with_net(mut self) -> Self {
        self.net_cf = self.premiums - self.claims - self.expenses - self.commissions;
        self
    }

    pub fn accumulate(&mut self, other: &PresentValues) {
        self.premiums += other.premiums;
        self.claims += other.claims;
        self.expenses += other.expenses;
        self.commissions += other.commissions;
        self.net_cf += other.net_cf;
        self.pols_if += other.pols_if;
    }

    /// Present value table rows in `RESULT_COLUMNS` order
    ///
    /// `% Premium` is 0 for every row when the premium present value is 0.
    pub fn table(&self) -> Vec<PvRow> {
        let values = [self.premiums, self.claims, self.expenses, self.commissions, self.net_cf];
        RESULT_COLUMNS
            .iter()
            .zip(values)
            .map(|(item, pv)| PvRow {
                item: (*item).to_string(),
                pv,
                pct_premium: if self.premiums != 0.0 { pv / self.premiums } else { 0.0 },
            })
            .collect()
    }
}

/// One row of the present value table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PvRow {
    #[serde(rename = "Item")]
    pub item: String,
    #[serde(rename = "PV")]
    pub pv: f64,
    #[serde(rename = "% Premium")]
    pub pct_premium: f64,
}

/// Complete projection result for one model point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub point_id: u32,

    /// Net premium per policy: pv_claims / pv_pols_if
    pub net_premium_pp: f64,

    /// Monthly gross premium per policy
    pub premium_pp: f64,

    /// Monthly cashflow rows, t = 0..proj_len
    pub cashflows: Vec<CashflowRow>,

    /// Decrement rows; empty unless detailed output was requested
    pub decrements: Vec<DecrementRow>,

    /// Discount factors used for the present values
    pub discount_factors: Vec<f64>,

    pub pv: PresentValues,
}

impl ProjectionResult {
    pub fn new(point_id: u32) -> Self {
        Self {
            point_id,
            net_premium_pp: 0.0,
            premium_pp: 0.0,
            cashflows: Vec::new(),
            decrements: Vec::new(),
            discount_factors: Vec::new(),
            pv: PresentValues::default(),
        }
    }

    pub fn proj_len(&self) -> usize {
        self.cashflows.len()
    }

    /// Per-period cashflow table
    pub fn result_cf(&self) -> &[CashflowRow] {
        &self.cashflows
    }

    /// Present value table with each PV as a share of premiums
    pub fn result_pv(&self) -> Vec<PvRow> {
        self.pv.table()
    }

    /// Discounted sum of the net cashflow column
    pub fn discounted_net_cf(&self) -> f64 {
        self.cashflows
            .iter()
            .zip(&self.discount_factors)
            .map(|(row, df)| row.net_cf * df)
            .sum()
    }

    /// Check the discounted net cashflows add up to the reported pv_net_cf
    pub fn check_pv_net_cf(&self) -> bool {
        is_close(self.discounted_net_cf(), self.pv.net_cf, PV_CHECK_TOLERANCE)
    }

    pub fn summary(&self) -> ProjectionSummary {
        ProjectionSummary {
            point_id: self.point_id,
            proj_len: self.proj_len(),
            net_premium_pp: self.net_premium_pp,
            premium_pp: self.premium_pp,
            total_premiums: self.cashflows.iter().map(|r| r.premiums).sum(),
            total_claims: self.cashflows.iter().map(|r| r.claims).sum(),
            total_net_cf: self.cashflows.iter().map(|r| r.net_cf).sum(),
            pv: self.pv,
            pv_check: self.check_pv_net_cf(),
        }
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub point_id: u32,
    pub proj_len: usize,
    pub net_premium_pp: f64,
    pub premium_pp: f64,
    pub total_premiums: f64,
    pub total_claims: f64,
    pub total_net_cf: f64,
    pub pv: PresentValues,
    pub pv_check: bool,
}

/// Relative closeness test: |a - b| <= rel_tol * max(|a|, |b|)
pub fn is_close(a: f64, b: f64, rel_tol: f64) -> bool {
    a == b || (a - b).abs() <= rel_tol * a.abs().max(b.abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pv_table_shares() {
        let pv = PresentValues {
            premiums: 200.0,
            claims: 100.0,
            expenses: 30.0,
            commissions: 20.0,
            net_cf: 0.0,
            pols_if: 10.0,
        }
        .with_net();

        assert_relative_eq!(pv.net_cf, 50.0);

        let table = pv.table();
        assert_eq!(table.len(), 5);
        assert_eq!(table[0].item, "Premiums");
        assert_relative_eq!(table[0].pct_premium, 1.0);
        assert_relative_eq!(table[1].pct_premium, 0.5);
        assert_eq!(table[4].item, "Net Cashflow");
        assert_relative_eq!(table[4].pct_premium, 0.25);
    }

    #[test]
    fn test_pv_table_without_premiums() {
        let pv = PresentValues {
            premiums: 0.0,
            claims: 0.0,
            expenses: 750.0,
            commissions: 0.0,
            net_cf: 0.0,
            pols_if: 86.0,
        }
        .with_net();

        let table = pv.table();
        assert_relative_eq!(table[2].pv, 750.0);
        assert_relative_eq!(table[4].pv, -750.0);
        assert!(table.iter().all(|row| row.pct_premium == 0.0));
    }

    #[test]
    fn test_is_close() {
        assert!(is_close(1.0, 1.0 + 1e-12, 1e-9));
        assert!(!is_close(1.0, 1.001, 1e-9));
        assert!(is_close(0.0, 0.0, 1e-9));
        assert!(!is_close(0.0, 1e-20, 1e-9));
    }

    #[test]
    fn test_row_accumulate() {
        let mut total = CashflowRow::new(3);
        let row = CashflowRow {
            t: 3,
            premiums: 10.0,
            claims: 4.0,
            expenses: 1.0,
            commissions: 0.0,
            net_cf: 5.0,
        };
        total.accumulate(&row);
        total.accumulate(&row);
        assert_eq!(total.t, 3);
        assert_relative_eq!(total.premiums, 20.0);
        assert_relative_eq!(total.net_cf, 10.0);
    }
}
