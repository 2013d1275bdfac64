//! Actuarial assumptions: mortality, lapse, discounting and product features

mod mortality;
mod discount;
mod lapse;
mod product;
pub mod loader;

pub use mortality::{MortalityTable, SELECT_PERIOD};
pub use discount::{DiscountCurve, discounted_sum};
pub use lapse::LapseAssumption;
pub use product::{ProductFeatures, round_cents};

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Container for all projection assumptions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Assumptions {
    pub mortality: MortalityTable,
    pub discount: DiscountCurve,
    pub lapse: LapseAssumption,
    pub product: ProductFeatures,
}

impl Assumptions {
    /// Built-in sample assumptions: sample select table, flat 3% curve
    pub fn sample() -> Self {
        Self::default()
    }

    /// Load assumptions from CSV files in the default location (data/)
    pub fn from_csv() -> Result<Self> {
        Self::from_csv_path(Path::new(crate::DEFAULT_DATA_PATH))
    }

    /// Load mortality and discount tables from a directory; lapse and
    /// product parameters take their defaults
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        Ok(Self {
            mortality: loader::load_mortality_table(path)?,
            discount: loader::load_discount_curve(path)?,
            lapse: LapseAssumption::default(),
            product: ProductFeatures::default(),
        })
    }
}
