//! CSV-based assumption loader
//!
//! Loads the mortality table and the discount curve from the data directory.

use super::{DiscountCurve, MortalityTable};
use crate::error::{ProjectionError, Result};
use std::fs::File;
use std::path::Path;

/// Mortality table file: header `age,0,1,2,3,4,5`
pub const MORTALITY_FILE: &str = "mort_table.csv";

/// Discount curve file: header `year,disc_rate_ann`
pub const DISCOUNT_FILE: &str = "disc_rate_ann.csv";

fn parse_field<T: std::str::FromStr>(record: &csv::StringRecord, idx: usize, what: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    let raw = record
        .get(idx)
        .ok_or_else(|| ProjectionError::Parse(format!("Missing {} column", what)))?;
    raw.trim()
        .parse()
        .map_err(|e| ProjectionError::Parse(format!("Bad {} value '{}': {}", what, raw, e)))
}

/// Load the mortality table from any reader
///
/// Ages must be consecutive; the first row sets the minimum age.
pub fn read_mortality_table<R: std::io::Read>(reader: R) -> Result<MortalityTable> {
    let mut reader = csv::Reader::from_reader(reader);

    let mut min_age = None;
    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result?;
        let age: u32 = parse_field(&record, 0, "age")?;

        let expected = min_age.map(|first: u32| first + rows.len() as u32);
        match expected {
            None => min_age = Some(age),
            Some(next) if next != age => {
                return Err(ProjectionError::InvalidData(format!(
                    "Mortality table ages must be consecutive: expected {}, found {}",
                    next, age
                )));
            }
            Some(_) => {}
        }

        let mut row = [0.0; 6];
        for (d, q) in row.iter_mut().enumerate() {
            *q = parse_field(&record, d + 1, "mortality rate")?;
        }
        rows.push(row);
    }

    let min_age = min_age.ok_or_else(|| ProjectionError::InvalidData("Mortality table is empty".into()))?;
    MortalityTable::new(min_age, rows)
}

/// Load the discount curve from any reader
///
/// Years must start at 0 and be consecutive.
pub fn read_discount_curve<R: std::io::Read>(reader: R) -> Result<DiscountCurve> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut rates = Vec::new();

    for result in reader.records() {
        let record = result?;
        let year: usize = parse_field(&record, 0, "year")?;
        if year != rates.len() {
            return Err(ProjectionError::InvalidData(format!(
                "Discount curve years must be consecutive from 0: expected {}, found {}",
                rates.len(),
                year
            )));
        }
        rates.push(parse_field(&record, 1, "discount rate")?);
    }

    DiscountCurve::new(rates)
}

pub fn load_mortality_table(path: &Path) -> Result<MortalityTable> {
    let table = read_mortality_table(File::open(path.join(MORTALITY_FILE))?)?;
    log::info!(
        "Loaded mortality table for ages {}-{}",
        table.min_age(),
        table.max_age()
    );
    Ok(table)
}

pub fn load_discount_curve(path: &Path) -> Result<DiscountCurve> {
    let curve = read_discount_curve(File::open(path.join(DISCOUNT_FILE))?)?;
    log::info!("Loaded discount curve to year {}", curve.max_year());
    Ok(curve)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_read_mortality_table() {
        let data = "age,0,1,2,3,4,5\n30,0.001,0.0011,0.0012,0.0013,0.0014,0.0015\n31,0.002,0.0021,0.0022,0.0023,0.0024,0.0025\n";
        let table = read_mortality_table(data.as_bytes()).unwrap();
        assert_eq!(table.min_age(), 30);
        assert_eq!(table.max_age(), 31);
        assert_relative_eq!(table.annual_rate(31, 2).unwrap(), 0.0022);
        assert_relative_eq!(table.annual_rate(30, 9).unwrap(), 0.0015);
    }

    #[test]
    fn test_mortality_gap_rejected() {
        let data = "age,0,1,2,3,4,5\n30,0,0,0,0,0,0\n32,0,0,0,0,0,0\n";
        assert!(matches!(
            read_mortality_table(data.as_bytes()),
            Err(ProjectionError::InvalidData(_))
        ));
    }

    #[test]
    fn test_read_discount_curve() {
        let data = "year,disc_rate_ann\n0,0.0\n1,0.00555\n2,0.00684\n";
        let curve = read_discount_curve(data.as_bytes()).unwrap();
        assert_eq!(curve.max_year(), 2);
        assert_relative_eq!(curve.annual_rate(1).unwrap(), 0.00555);
    }

    #[test]
    fn test_discount_curve_must_start_at_zero() {
        let data = "year,disc_rate_ann\n1,0.00555\n";
        assert!(read_discount_curve(data.as_bytes()).is_err());
    }

    #[test]
    fn test_load_shipped_assumptions() {
        let dir = Path::new(crate::DEFAULT_DATA_PATH);

        let mortality = load_mortality_table(dir).expect("Failed to load mortality");
        assert_eq!(mortality.min_age(), 18);
        assert_eq!(mortality.max_age(), 120);
        assert_relative_eq!(mortality.annual_rate(18, 0).unwrap(), 0.000231);
        assert_relative_eq!(mortality.annual_rate(18, 5).unwrap(), 0.000372);
        assert_relative_eq!(mortality.annual_rate(19, 0).unwrap(), 0.000235);
        assert_relative_eq!(mortality.annual_rate(20, 0).unwrap(), 0.000240);
        assert_relative_eq!(mortality.annual_rate(21, 0).unwrap(), 0.000245);
        assert_relative_eq!(mortality.annual_rate(22, 0).unwrap(), 0.000250);
        assert_relative_eq!(mortality.annual_rate(120, 5).unwrap(), 1.0);

        let curve = load_discount_curve(dir).expect("Failed to load discount curve");
        assert_eq!(curve.max_year(), 150);
        assert_relative_eq!(curve.annual_rate(4).unwrap(), 0.00866);
        assert_relative_eq!(curve.annual_rate(150).unwrap(), 0.03056);
    }
}
