use std::ops::Deref;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row as delivered by the external loader, before normalization.
///
/// Field names follow the dataset columns. Cells that may legitimately be
/// blank in the source are `Option`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    pub id: String,
    pub name: String,
    pub date: String,
    pub lat: f64,
    #[serde(alias = "long")]
    pub lon: f64,
    pub city: String,
    pub state: String,
    pub gender: String,
    pub race: String,
    #[serde(default)]
    pub officer_races: Option<String>,
    pub death_cause: String,
    pub v_armed: String,
    #[serde(default)]
    pub age: Option<String>,
    #[serde(default)]
    pub circumstances: Option<String>,
}

/// Canonical incident. Built once by `normalize` and never mutated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IncidentRecord {
    pub id: String,
    pub name: String,
    pub date: NaiveDate,
    /// Four-digit year of `date`.
    pub year: String,
    pub city: String,
    /// Full region name, or empty when the source abbreviation is unknown.
    pub state: String,
    pub lat: f64,
    pub lon: f64,
    pub victim_race: String,
    pub gender: String,
    pub age: Option<u32>,
    pub officer_races: String,
    pub death_cause: String,
    pub victim_armed_status: String,
    pub circumstances: String,
}

impl IncidentRecord {
    /// Date as `YYYY-MM-DD`, the form shown in popups.
    pub fn date_label(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn has_region(&self) -> bool {
        !self.state.is_empty()
    }
}

/// Shared read-only record collection.
///
/// Cloning is a reference-count bump, so every session can hold its own
/// handle without copying or locking.
#[derive(Clone, Debug)]
pub struct Dataset {
    records: Arc<[IncidentRecord]>,
}

impl Dataset {
    pub fn new(records: Vec<IncidentRecord>) -> Self {
        Self { records: records.into() }
    }

    pub fn records(&self) -> &[IncidentRecord] {
        &self.records
    }

    /// True when both handles point at the same allocation.
    pub fn same_as(&self, other: &Dataset) -> bool {
        Arc::ptr_eq(&self.records, &other.records)
    }
}

impl Default for Dataset {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Deref for Dataset {
    type Target = [IncidentRecord];

    fn deref(&self) -> &Self::Target {
        &self.records
    }
}

impl From<Vec<IncidentRecord>> for Dataset {
    fn from(records: Vec<IncidentRecord>) -> Self {
        Self::new(records)
    }
}
