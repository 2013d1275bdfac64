//! Duration-based lapse assumption
//!
//! Annual lapse rate grades down linearly by policy duration to a floor:
//! max(initial - decrease * duration, floor).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LapseAssumption {
    /// Annual lapse rate in the first policy year
    pub initial_rate: f64,

    /// Reduction of the annual rate per completed policy year
    pub annual_decrease: f64,

    /// Minimum annual rate
    pub floor: f64,
}

impl LapseAssumption {
    pub fn new(initial_rate: f64, annual_decrease: f64, floor: f64) -> Self {
        Self {
            initial_rate,
            annual_decrease,
            floor,
        }
    }

    /// Annual lapse rate for a duration in whole years
    pub fn annual_rate(&self, duration: u32) -> f64 {
        (self.initial_rate - self.annual_decrease * duration as f64).max(self.floor)
    }

    /// Monthly equivalent of the annual rate: 1 - (1 - rate)^(1/12)
    pub fn monthly_rate(&self, duration: u32) -> f64 {
        1.0 - (1.0 - self.annual_rate(duration)).powf(1.0 / 12.0)
    }
}

impl Default for LapseAssumption {
    fn default() -> Self {
        Self::new(0.10, 0.02, 0.02)
    }
}
