//! Core projection engine for monthly term-life cashflow projections
//!
//! A model point is projected in two passes. The decrement pass rolls the
//! policies in force forward month by month until maturity. The cashflow
//! pass needs the premium, which is solved from the present values of the
//! decrement pass (pv_claims / pv_pols_if), so it runs afterwards.

use crate::assumptions::{Assumptions, LapseAssumption, ProductFeatures, discounted_sum};
use crate::error::{ProjectionError, Result};
use crate::policy::ModelPoint;
use super::state::ProjectionState;
use super::cashflows::{CashflowRow, DecrementRow, PresentValues, ProjectionResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a projection run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Start with `policy_count` policies in force instead of one
    pub scale_by_policy_count: bool,

    /// Keep the per-month decrement rows in the result
    pub detailed_output: bool,

    /// Multiplier applied to every mortality rate
    pub mortality_multiplier: f64,

    /// Override of the product parameters
    pub product: Option<ProductFeatures>,

    /// Override of the lapse assumption
    pub lapse: Option<LapseAssumption>,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            scale_by_policy_count: false,
            detailed_output: false,
            mortality_multiplier: 1.0,
            product: None,
            lapse: None,
        }
    }
}

impl ProjectionConfig {
    /// Read a JSON config; missing fields take their defaults
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let config = serde_json::from_reader(std::io::BufReader::new(file))?;
        Ok(config)
    }

    /// Apply the overrides to a set of assumptions
    pub fn apply(&self, assumptions: &mut Assumptions) -> Result<()> {
        if !self.mortality_multiplier.is_finite() || self.mortality_multiplier < 0.0 {
            return Err(ProjectionError::InvalidData(format!(
                "Invalid mortality multiplier {}",
                self.mortality_multiplier
            )));
        }
        if self.mortality_multiplier != 1.0 {
            assumptions.mortality.scale(self.mortality_multiplier);
        }
        if let Some(product) = &self.product {
            assumptions.product = product.clone();
        }
        if let Some(lapse) = &self.lapse {
            assumptions.lapse = lapse.clone();
        }
        Ok(())
    }
}

/// Main projection engine
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    assumptions: Assumptions,
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Create a new projection engine; config overrides are applied to the
    /// engine's copy of the assumptions
    pub fn new(mut assumptions: Assumptions, config: ProjectionConfig) -> Result<Self> {
        config.apply(&mut assumptions)?;
        Ok(Self { assumptions, config })
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Number of policies in force at t = 0
    pub fn pols_if_init(&self, point: &ModelPoint) -> f64 {
        if self.config.scale_by_policy_count {
            point.policy_count
        } else {
            1.0
        }
    }

    /// Run projection for a single model point
    pub fn project_point(&self, point: &ModelPoint) -> Result<ProjectionResult> {
        point.validate()?;

        let discount_factors = self.assumptions.discount.discount_factors(point.proj_len())?;
        let decrements = self.project_decrements(point, &discount_factors)?;

        let pols_if: Vec<f64> = decrements.iter().map(|r| r.pols_if).collect();
        let claims: Vec<f64> = decrements
            .iter()
            .map(|r| self.claim_pp(point) * r.pols_death)
            .collect();

        let pv_pols_if = discounted_sum(&pols_if, &discount_factors);
        let pv_claims = discounted_sum(&claims, &discount_factors);

        let net_premium_pp = if pv_pols_if > 0.0 { pv_claims / pv_pols_if } else { 0.0 };
        let premium_pp = self.assumptions.product.gross_premium(net_premium_pp);

        let cashflows: Vec<CashflowRow> = decrements
            .iter()
            .zip(&claims)
            .map(|(row, &claim)| self.calculate_cashflows(row, claim, premium_pp))
            .collect();

        let pv = PresentValues {
            premiums: pv_column(&cashflows, &discount_factors, |r| r.premiums),
            claims: pv_claims,
            expenses: pv_column(&cashflows, &discount_factors, |r| r.expenses),
            commissions: pv_column(&cashflows, &discount_factors, |r| r.commissions),
            net_cf: 0.0,
            pols_if: pv_pols_if,
        }
        .with_net();

        let mut result = ProjectionResult::new(point.point_id);
        result.net_premium_pp = net_premium_pp;
        result.premium_pp = premium_pp;
        result.cashflows = cashflows;
        result.discount_factors = discount_factors;
        result.pv = pv;
        if self.config.detailed_output {
            result.decrements = decrements;
        }

        log::debug!(
            "Projected point {}: {} months, premium_pp {:.2}, pv_net_cf {:.2}",
            point.point_id,
            result.proj_len(),
            premium_pp,
            pv.net_cf
        );

        Ok(result)
    }

    /// Roll policies in force forward from t = 0 to the maturity month
    pub fn project_decrements(
        &self,
        point: &ModelPoint,
        discount_factors: &[f64],
    ) -> Result<Vec<DecrementRow>> {
        let mut state = ProjectionState::from_model_point(point, self.pols_if_init(point));
        let mut rows = Vec::with_capacity(point.proj_len());

        loop {
            let mut row = self.calculate_decrements(&state)?;
            row.disc_factor = discount_factors
                .get(state.t as usize)
                .copied()
                .ok_or_else(|| {
                    ProjectionError::MissingAssumption(format!("Discount factor for month {}", state.t))
                })?;
            rows.push(row);

            if state.at_maturity() {
                break;
            }
            let last = &rows[rows.len() - 1];
            state.advance_month(point, last);
        }

        Ok(rows)
    }

    /// Decrements during the month starting at the given state
    fn calculate_decrements(&self, state: &ProjectionState) -> Result<DecrementRow> {
        let mut row = DecrementRow::new(state.t);
        row.duration = state.duration;
        row.age = state.age;

        row.mort_rate_mth = self.assumptions.mortality.monthly_rate(state.age, state.duration)?;
        row.lapse_rate = self.assumptions.lapse.annual_rate(state.duration);

        row.pols_if = state.pols_if;
        row.pols_maturity = state.pols_maturity;
        row.pols_death = state.pols_if * row.mort_rate_mth;
        row.pols_lapse = state.pols_if * self.assumptions.lapse.monthly_rate(state.duration);

        Ok(row)
    }

    /// Claim per policy: the sum assured
    fn claim_pp(&self, point: &ModelPoint) -> f64 {
        point.sum_assured
    }

    /// Dollar cashflows for a month given the decrements and claims
    fn calculate_cashflows(&self, row: &DecrementRow, claims: f64, premium_pp: f64) -> CashflowRow {
        let product = &self.assumptions.product;

        let mut cf = CashflowRow::new(row.t);
        cf.premiums = premium_pp * row.pols_if;
        cf.claims = claims;

        cf.expenses = row.pols_if * product.monthly_maintenance(row.t);
        if row.t == 0 {
            cf.expenses += product.expense_acq;
        }

        cf.commissions = cf.premiums * product.commission_rate(row.duration);
        cf.net_cf = cf.premiums - cf.claims - cf.expenses - cf.commissions;
        cf
    }
}

/// Present value of one column of the cashflow table
fn pv_column(rows: &[CashflowRow], factors: &[f64], column: impl Fn(&CashflowRow) -> f64) -> f64 {
    rows.iter().zip(factors).map(|(row, df)| column(row) * df).sum()
}
