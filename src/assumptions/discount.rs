//! Discount curve of annual spot rates by whole year
//!
//! The rate for month t is the annual rate of year t / 12 converted to a
//! monthly rate, and the discount factor compounds that rate over all t
//! months: v(t) = (1 + i_m(t))^(-t).

use crate::error::{ProjectionError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountCurve {
    /// Annual spot rates, index = year
    annual_rates: Vec<f64>,
}

impl DiscountCurve {
    /// Create from annual rates indexed by year starting at 0
    pub fn new(annual_rates: Vec<f64>) -> Result<Self> {
        if annual_rates.is_empty() {
            return Err(ProjectionError::InvalidData("Discount curve is empty".into()));
        }
        if let Some(r) = annual_rates.iter().find(|r| !r.is_finite() || **r <= -1.0) {
            return Err(ProjectionError::InvalidData(format!(
                "Invalid annual discount rate {}",
                r
            )));
        }
        Ok(Self { annual_rates })
    }

    /// Same annual rate for years 0 through `years`
    pub fn flat(annual_rate: f64, years: usize) -> Self {
        Self {
            annual_rates: vec![annual_rate; years + 1],
        }
    }

    pub fn annual_rates(&self) -> &[f64] {
        &self.annual_rates
    }

    /// Last year covered by the curve
    pub fn max_year(&self) -> usize {
        self.annual_rates.len() - 1
    }

    pub fn annual_rate(&self, year: u32) -> Result<f64> {
        self.annual_rates.get(year as usize).copied().ok_or_else(|| {
            ProjectionError::MissingAssumption(format!(
                "No discount rate for year {} (curve ends at year {})",
                year,
                self.max_year()
            ))
        })
    }

    /// Monthly rate at month t: (1 + annual[t / 12])^(1/12) - 1
    pub fn monthly_rate(&self, t: u32) -> Result<f64> {
        let annual = self.annual_rate(t / 12)?;
        Ok((1.0 + annual).powf(1.0 / 12.0) - 1.0)
    }

    /// Discount factor from month t back to time zero
    pub fn discount_factor(&self, t: u32) -> Result<f64> {
        let monthly = self.monthly_rate(t)?;
        Ok((1.0 + monthly).powf(-(t as f64)))
    }

    /// Discount factors for months 0..len
    pub fn discount_factors(&self, len: usize) -> Result<Vec<f64>> {
        (0..len as u32).map(|t| self.discount_factor(t)).collect()
    }

    /// Present value of a monthly stream starting at t = 0
    pub fn present_value(&self, stream: &[f64]) -> Result<f64> {
        let factors = self.discount_factors(stream.len())?;
        Ok(discounted_sum(stream, &factors))
    }
}

impl Default for DiscountCurve {
    fn default() -> Self {
        Self::flat(0.03, 150)
    }
}

/// Sum of `values[t] * factors[t]` over the shorter of the two slices
pub fn discounted_sum(values: &[f64], factors: &[f64]) -> f64 {
    values.iter().zip(factors).map(|(v, df)| v * df).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_flat_curve_factors() {
        let curve = DiscountCurve::flat(0.05, 10);

        assert_relative_eq!(curve.discount_factor(0).unwrap(), 1.0);
        assert_relative_eq!(curve.discount_factor(12).unwrap(), 1.0 / 1.05, epsilon = 1e-12);
        assert_relative_eq!(
            curve.discount_factor(30).unwrap(),
            1.05_f64.powf(-2.5),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_spot_rate_switches_by_year() {
        let curve = DiscountCurve::new(vec![0.0, 0.02, 0.03]).unwrap();

        // Year 0 rate is zero, so no discounting in the first 12 months
        assert_relative_eq!(curve.discount_factor(11).unwrap(), 1.0);
        // Month 12 uses the year-1 rate over the full 12 months
        assert_relative_eq!(curve.discount_factor(12).unwrap(), 1.0 / 1.02, epsilon = 1e-12);
        assert_relative_eq!(
            curve.discount_factor(24).unwrap(),
            1.03_f64.powi(-2),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_beyond_curve_is_missing() {
        let curve = DiscountCurve::flat(0.03, 2);
        assert!(curve.discount_factor(35).is_ok());
        assert!(matches!(
            curve.discount_factor(36),
            Err(ProjectionError::MissingAssumption(_))
        ));
    }

    #[test]
    fn test_present_value() {
        let curve = DiscountCurve::flat(0.0, 1);
        assert_relative_eq!(curve.present_value(&[1.0, 2.0, 3.0]).unwrap(), 6.0);

        let curve = DiscountCurve::flat(0.10, 1);
        let mut stream = vec![0.0; 13];
        stream[12] = 110.0;
        assert_relative_eq!(curve.present_value(&stream).unwrap(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_invalid_rate_rejected() {
        assert!(DiscountCurve::new(vec![]).is_err());
        assert!(DiscountCurve::new(vec![0.01, f64::NAN]).is_err());
    }
}
