//! Product features: premium loading, expenses and commissions

use serde::{Deserialize, Serialize};

/// Pricing and expense parameters of the term product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductFeatures {
    /// Acquisition expense per model point, incurred at t = 0
    pub expense_acq: f64,

    /// Annual maintenance expense per policy in force
    pub expense_maint: f64,

    /// Annual expense inflation
    pub inflation_rate: f64,

    /// Loading on the net premium
    pub loading_prem: f64,

    /// Share of premium paid as commission during the first policy year
    pub first_year_commission: f64,
}

impl ProductFeatures {
    /// Inflation factor at month t, stepping up once per completed year
    pub fn inflation_factor(&self, t: u32) -> f64 {
        (1.0 + self.inflation_rate).powi((t / 12) as i32)
    }

    /// Monthly maintenance expense per policy at month t
    pub fn monthly_maintenance(&self, t: u32) -> f64 {
        self.expense_maint / 12.0 * self.inflation_factor(t)
    }

    /// Gross monthly premium per policy, rounded to cents
    pub fn gross_premium(&self, net_premium: f64) -> f64 {
        round_cents((1.0 + self.loading_prem) * net_premium)
    }

    /// Commission rate applied to premiums at a given duration
    pub fn commission_rate(&self, duration: u32) -> f64 {
        if duration == 0 {
            self.first_year_commission
        } else {
            0.0
        }
    }
}

impl Default for ProductFeatures {
    fn default() -> Self {
        Self {
            expense_acq: 300.0,
            expense_maint: 60.0,
            inflation_rate: 0.01,
            loading_prem: 0.50,
            first_year_commission: 1.0,
        }
    }
}

/// Round to 2 decimals, ties to even
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_inflation_steps_yearly() {
        let product = ProductFeatures::default();
        assert_relative_eq!(product.inflation_factor(0), 1.0);
        assert_relative_eq!(product.inflation_factor(11), 1.0);
        assert_relative_eq!(product.inflation_factor(12), 1.01);
        assert_relative_eq!(product.inflation_factor(36), 1.01_f64.powi(3));
    }

    #[test]
    fn test_monthly_maintenance() {
        let product = ProductFeatures::default();
        assert_relative_eq!(product.monthly_maintenance(0), 5.0);
        assert_relative_eq!(product.monthly_maintenance(24), 5.0 * 1.0201, epsilon = 1e-12);
    }

    #[test]
    fn test_gross_premium_rounding() {
        let product = ProductFeatures::default();
        assert_relative_eq!(product.gross_premium(100.32114871347626), 150.48);
        assert_relative_eq!(round_cents(0.125), 0.12);
        assert_relative_eq!(round_cents(2.675), 2.67);
    }

    #[test]
    fn test_commission_first_year_only() {
        let product = ProductFeatures::default();
        assert_eq!(product.commission_rate(0), 1.0);
        assert_eq!(product.commission_rate(1), 0.0);
    }
}
