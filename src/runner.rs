//! Model runner: point selection, memoized projections and block runs
//!
//! Loads the model point table and assumptions once, then projects any
//! point on demand. Results are cached per point id, so repeated requests
//! for the same point reuse the earlier projection.

use crate::assumptions::Assumptions;
use crate::error::{ProjectionError, Result};
use crate::policy::{self, ModelPoint, ModelPointTable};
use crate::projection::{
    is_close, CashflowRow, PresentValues, ProjectionConfig, ProjectionEngine, ProjectionResult,
    PvRow, PV_CHECK_TOLERANCE,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Pre-loaded runner over a model point table
///
/// # Example
/// ```ignore
/// let mut runner = ModelRunner::from_csv_path(Path::new("data"), ProjectionConfig::default())?;
/// runner.select(2)?;
/// let result = runner.project_selected()?;
/// println!("{}", result.pv.net_cf);
/// ```
#[derive(Debug)]
pub struct ModelRunner {
    table: ModelPointTable,
    engine: ProjectionEngine,

    /// Active model point
    point_id: u32,

    cache: Mutex<HashMap<u32, Arc<ProjectionResult>>>,
}

impl ModelRunner {
    /// Create a runner; the first point in the table becomes active
    pub fn new(table: ModelPointTable, assumptions: Assumptions, config: ProjectionConfig) -> Result<Self> {
        let point_id = table
            .first_id()
            .ok_or_else(|| ProjectionError::InvalidData("Model point table is empty".into()))?;

        Ok(Self {
            table,
            engine: ProjectionEngine::new(assumptions, config)?,
            point_id,
            cache: Mutex::new(HashMap::new()),
        })
    }

    /// Load the model points and assumptions from a data directory
    pub fn from_csv_path(data_dir: &Path, config: ProjectionConfig) -> Result<Self> {
        let table = policy::load_model_points_from_dir(data_dir)?;
        let assumptions = Assumptions::from_csv_path(data_dir)?;
        Self::new(table, assumptions, config)
    }

    pub fn table(&self) -> &ModelPointTable {
        &self.table
    }

    pub fn engine(&self) -> &ProjectionEngine {
        &self.engine
    }

    /// Id of the active model point
    pub fn point_id(&self) -> u32 {
        self.point_id
    }

    /// Make another point active; unknown ids leave the selection unchanged
    pub fn select(&mut self, point_id: u32) -> Result<()> {
        if !self.table.contains(point_id) {
            return Err(ProjectionError::UnknownModelPoint(point_id));
        }
        self.point_id = point_id;
        Ok(())
    }

    /// The active model point record
    pub fn model_point(&self) -> Result<&ModelPoint> {
        self.table.get(self.point_id)
    }

    pub fn project_selected(&self) -> Result<Arc<ProjectionResult>> {
        self.project(self.point_id)
    }

    /// Project one point, reusing a cached result when available
    pub fn project(&self, point_id: u32) -> Result<Arc<ProjectionResult>> {
        if let Some(hit) = self.lock_cache().get(&point_id) {
            return Ok(Arc::clone(hit));
        }

        let point = self.table.get(point_id)?;
        let result = Arc::new(self.engine.project_point(point)?);

        if !result.check_pv_net_cf() {
            log::warn!("Present value check failed for point {}", point_id);
        }

        let mut cache = self.lock_cache();
        let entry = cache.entry(point_id).or_insert(result);
        Ok(Arc::clone(entry))
    }

    /// Project every point in parallel, ordered by point id
    pub fn project_all(&self) -> Result<Vec<Arc<ProjectionResult>>> {
        self.table
            .ids()
            .par_iter()
            .map(|&id| self.project(id))
            .collect()
    }

    /// Project every point and aggregate cashflows and present values
    pub fn run_block(&self) -> Result<BlockResult> {
        log::info!("Running block of {} model points", self.table.len());
        let results = self.project_all()?;
        let block = BlockResult::aggregate(&results);
        log::info!(
            "Block complete: {} periods, pv_net_cf {:.2}",
            block.cashflows.len(),
            block.pv.net_cf
        );
        Ok(block)
    }

    pub fn clear_cache(&self) {
        self.lock_cache().clear();
    }

    pub fn cached_count(&self) -> usize {
        self.lock_cache().len()
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, HashMap<u32, Arc<ProjectionResult>>> {
        // Entries are never mutated in place; a poisoned map is still consistent
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Cashflows and present values summed across model points
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockResult {
    pub point_count: usize,

    /// Cashflows summed by month; shorter projections contribute zeros
    pub cashflows: Vec<CashflowRow>,

    /// Discount factors of the longest projection
    pub discount_factors: Vec<f64>,

    pub pv: PresentValues,

    /// Points whose present value check failed
    pub failed_checks: Vec<u32>,
}

impl BlockResult {
    pub fn aggregate(results: &[Arc<ProjectionResult>]) -> Self {
        let len = results.iter().map(|r| r.proj_len()).max().unwrap_or(0);

        let mut cashflows: Vec<CashflowRow> = (0..len as u32).map(CashflowRow::new).collect();
        let mut pv = PresentValues::default();
        let mut discount_factors: &[f64] = &[];
        let mut failed_checks = Vec::new();

        for result in results {
            for (total, row) in cashflows.iter_mut().zip(&result.cashflows) {
                total.accumulate(row);
            }
            pv.accumulate(&result.pv);
            if result.discount_factors.len() > discount_factors.len() {
                discount_factors = &result.discount_factors;
            }
            if !result.check_pv_net_cf() {
                failed_checks.push(result.point_id);
            }
        }

        Self {
            point_count: results.len(),
            cashflows,
            discount_factors: discount_factors.to_vec(),
            pv,
            failed_checks,
        }
    }

    pub fn result_cf(&self) -> &[CashflowRow] {
        &self.cashflows
    }

    pub fn result_pv(&self) -> Vec<PvRow> {
        self.pv.table()
    }

    /// Check the discounted block net cashflows add up to the summed pv_net_cf
    ///
    /// Valid because every point discounts month t with the same factor.
    pub fn check_pv_net_cf(&self) -> bool {
        let discounted: f64 = self
            .cashflows
            .iter()
            .zip(&self.discount_factors)
            .map(|(row, df)| row.net_cf * df)
            .sum();
        is_close(discounted, self.pv.net_cf, PV_CHECK_TOLERANCE * 100.0)
    }
}
