//! Projection engine for single and multi-point projections

mod state;
mod engine;
mod cashflows;

pub use state::ProjectionState;
pub use engine::{ProjectionEngine, ProjectionConfig};
pub use cashflows::{
    CashflowRow, DecrementRow, PresentValues, ProjectionResult, ProjectionSummary, PvRow,
    is_close, PV_CHECK_TOLERANCE, RESULT_COLUMNS,
};
