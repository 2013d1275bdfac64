//! CSV and JSON writers for projection results

use crate::error::Result;
use crate::projection::{CashflowRow, DecrementRow, ProjectionSummary, PvRow};
use crate::runner::BlockResult;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write the per-period cashflow table
pub fn write_result_cf<W: Write>(writer: W, rows: &[CashflowRow]) -> Result<()> {
    write_rows(writer, rows)
}

/// Write the present value table
pub fn write_result_pv<W: Write>(writer: W, rows: &[PvRow]) -> Result<()> {
    write_rows(writer, rows)
}

/// Write the decrement table
pub fn write_decrements<W: Write>(writer: W, rows: &[DecrementRow]) -> Result<()> {
    write_rows(writer, rows)
}

fn write_rows<W: Write, T: Serialize>(writer: W, rows: &[T]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Create a file and wrap it in a buffered writer
pub fn create_file(path: &Path) -> Result<BufWriter<File>> {
    Ok(BufWriter::new(File::create(path)?))
}

/// JSON report of a single-point run
#[derive(Debug, Serialize)]
pub struct PointReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub summary: &'a ProjectionSummary,
    pub result_pv: &'a [PvRow],
}

/// JSON report of a block run
#[derive(Debug, Serialize)]
pub struct BlockReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub point_count: usize,
    pub pv_check: bool,
    pub failed_checks: &'a [u32],
    pub result_pv: Vec<PvRow>,
}

impl<'a> BlockReport<'a> {
    pub fn new(block: &'a BlockResult) -> Self {
        Self {
            generated_at: Utc::now(),
            point_count: block.point_count,
            pv_check: block.check_pv_net_cf(),
            failed_checks: &block.failed_checks,
            result_pv: block.result_pv(),
        }
    }
}

/// Serialize any report as pretty JSON
pub fn write_json<W: Write, T: Serialize>(writer: W, report: &T) -> Result<()> {
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::PresentValues;

    #[test]
    fn test_result_cf_csv_header() {
        let rows = vec![CashflowRow {
            t: 0,
            premiums: 150.48,
            claims: 45.5,
            expenses: 305.0,
            commissions: 150.48,
            net_cf: -350.5,
        }];

        let mut buf = Vec::new();
        write_result_cf(&mut buf, &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("t,Premiums,Claims,Expenses,Commissions,Net Cashflow"));
        assert_eq!(lines.next(), Some("0,150.48,45.5,305.0,150.48,-350.5"));
    }

    #[test]
    fn test_result_pv_csv() {
        let pv = PresentValues {
            premiums: 100.0,
            claims: 60.0,
            ..Default::default()
        }
        .with_net();

        let mut buf = Vec::new();
        write_result_pv(&mut buf, &pv.table()).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.starts_with("Item,PV,% Premium\n"));
        assert!(text.contains("Claims,60.0,0.6\n"));
        assert_eq!(text.lines().count(), 6);
    }

    #[test]
    fn test_block_report_json() {
        let block = BlockResult {
            point_count: 2,
            cashflows: Vec::new(),
            discount_factors: Vec::new(),
            pv: PresentValues::default(),
            failed_checks: vec![],
        };

        let mut buf = Vec::new();
        write_json(&mut buf, &BlockReport::new(&block)).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(value["point_count"], 2);
        assert_eq!(value["result_pv"].as_array().unwrap().len(), 5);
        assert!(value["generated_at"].is_string());
    }
}
