//! Model point records and the model point table

use crate::error::{ProjectionError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Sex of the insured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    M,
    F,
}

impl FromStr for Sex {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "M" => Ok(Sex::M),
            "F" => Ok(Sex::F),
            other => Err(ProjectionError::Parse(format!("Unknown sex: {}", other))),
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::M => write!(f, "M"),
            Sex::F => write!(f, "F"),
        }
    }
}

/// A single model point: one representative term policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPoint {
    /// Identifier, unique within the table
    pub point_id: u32,

    /// Age at entry in whole years
    pub age_at_entry: u32,

    pub sex: Sex,

    /// Policy term in whole years
    pub policy_term: u32,

    /// Number of policies represented (only used when scaling is enabled)
    pub policy_count: f64,

    /// Death benefit per policy
    pub sum_assured: f64,
}

impl ModelPoint {
    pub fn new(
        point_id: u32,
        age_at_entry: u32,
        sex: Sex,
        policy_term: u32,
        policy_count: f64,
        sum_assured: f64,
    ) -> Self {
        Self {
            point_id,
            age_at_entry,
            sex,
            policy_term,
            policy_count,
            sum_assured,
        }
    }

    /// Month at which the policy matures (12 * term)
    pub fn maturity_month(&self) -> u32 {
        self.policy_term * 12
    }

    /// Projection length in months, maturity month included
    pub fn proj_len(&self) -> usize {
        self.maturity_month() as usize + 1
    }

    /// Duration in force in whole years at month t
    pub fn duration(&self, t: u32) -> u32 {
        t / 12
    }

    /// Attained age at month t
    pub fn age(&self, t: u32) -> u32 {
        self.age_at_entry + self.duration(t)
    }

    /// Check the record can be projected
    pub fn validate(&self) -> Result<()> {
        if self.policy_term == 0 {
            return Err(ProjectionError::InvalidData(format!(
                "Model point {}: policy term must be positive",
                self.point_id
            )));
        }
        // maturity_month and age(t) must not overflow u32
        if self.policy_term.checked_mul(12).is_none()
            || self.age_at_entry.checked_add(self.policy_term).is_none()
        {
            return Err(ProjectionError::InvalidData(format!(
                "Model point {}: policy term {} out of range for entry age {}",
                self.point_id, self.policy_term, self.age_at_entry
            )));
        }
        if !self.sum_assured.is_finite() || self.sum_assured < 0.0 {
            return Err(ProjectionError::InvalidData(format!(
                "Model point {}: invalid sum assured {}",
                self.point_id, self.sum_assured
            )));
        }
        if !self.policy_count.is_finite() || self.policy_count < 0.0 {
            return Err(ProjectionError::InvalidData(format!(
                "Model point {}: invalid policy count {}",
                self.point_id, self.policy_count
            )));
        }
        Ok(())
    }
}

/// All model points keyed by `point_id`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelPointTable {
    points: BTreeMap<u32, ModelPoint>,
}

impl ModelPointTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table, rejecting duplicate ids and invalid records
    pub fn from_points(points: Vec<ModelPoint>) -> Result<Self> {
        let mut table = Self::new();
        for point in points {
            table.insert(point)?;
        }
        Ok(table)
    }

    pub fn insert(&mut self, point: ModelPoint) -> Result<()> {
        point.validate()?;
        if self.points.contains_key(&point.point_id) {
            return Err(ProjectionError::InvalidData(format!(
                "Duplicate point_id {}",
                point.point_id
            )));
        }
        self.points.insert(point.point_id, point);
        Ok(())
    }

    pub fn get(&self, point_id: u32) -> Result<&ModelPoint> {
        self.points
            .get(&point_id)
            .ok_or(ProjectionError::UnknownModelPoint(point_id))
    }

    pub fn contains(&self, point_id: u32) -> bool {
        self.points.contains_key(&point_id)
    }

    /// Point ids in ascending order
    pub fn ids(&self) -> Vec<u32> {
        self.points.keys().copied().collect()
    }

    pub fn first_id(&self) -> Option<u32> {
        self.points.keys().next().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelPoint> {
        self.points.values()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
