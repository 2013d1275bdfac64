//! Load model points from model_point_table.csv

use super::{ModelPoint, ModelPointTable, Sex};
use crate::error::Result;
use csv::Reader;
use std::path::Path;

/// Default file name of the model point table inside the data directory
pub const MODEL_POINT_FILE: &str = "model_point_table.csv";

/// Raw CSV row matching model_point_table.csv columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    point_id: u32,
    age_at_entry: u32,
    sex: String,
    policy_term: u32,
    policy_count: f64,
    sum_assured: f64,
}

impl CsvRow {
    fn into_model_point(self) -> Result<ModelPoint> {
        let sex: Sex = self.sex.parse()?;

        Ok(ModelPoint {
            point_id: self.point_id,
            age_at_entry: self.age_at_entry,
            sex,
            policy_term: self.policy_term,
            policy_count: self.policy_count,
            sum_assured: self.sum_assured,
        })
    }
}

/// Load all model points from a CSV file
pub fn load_model_points<P: AsRef<Path>>(path: P) -> Result<ModelPointTable> {
    let path = path.as_ref();
    let reader = Reader::from_path(path)?;
    let table = read_table(reader)?;
    log::info!("Loaded {} model points from {}", table.len(), path.display());
    Ok(table)
}

/// Load model points from any reader (e.g., string buffer)
pub fn load_model_points_from_reader<R: std::io::Read>(reader: R) -> Result<ModelPointTable> {
    read_table(Reader::from_reader(reader))
}

/// Load model points from `<data_dir>/model_point_table.csv`
pub fn load_model_points_from_dir(data_dir: &Path) -> Result<ModelPointTable> {
    load_model_points(data_dir.join(MODEL_POINT_FILE))
}

fn read_table<R: std::io::Read>(mut reader: Reader<R>) -> Result<ModelPointTable> {
    let mut table = ModelPointTable::new();
    for result in reader.deserialize() {
        let row: CsvRow = result?;
        table.insert(row.into_model_point()?)?;
    }
    Ok(table)
}
