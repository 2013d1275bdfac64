//! Term Projection - monthly cashflow projection for basic term life model points
//!
//! This library provides:
//! - Model point and assumption loading from CSV tables
//! - Policy-in-force recurrence with deaths, lapses and maturities
//! - Premium solving, cashflows and present values per model point
//! - Memoized per-point results and parallel block runs

pub mod error;
pub mod policy;
pub mod assumptions;
pub mod projection;
pub mod runner;
pub mod output;

/// Default directory holding the model point table and assumption files
pub const DEFAULT_DATA_PATH: &str = "data";

// Re-export commonly used types
pub use error::{ProjectionError, Result};
pub use policy::{ModelPoint, ModelPointTable, Sex};
pub use assumptions::{Assumptions, DiscountCurve, LapseAssumption, MortalityTable, ProductFeatures};
pub use projection::{CashflowRow, ProjectionConfig, ProjectionEngine, ProjectionResult};
pub use runner::{BlockResult, ModelRunner};
