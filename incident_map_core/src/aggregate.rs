use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::record::IncidentRecord;

/// Per-region incident counts. Sparse: regions without matches are absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionAggregate {
    counts: BTreeMap<String, u64>,
}

impl RegionAggregate {
    pub fn get(&self, region: &str) -> Option<u64> {
        self.counts.get(region).copied()
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Regions in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn into_inner(self) -> BTreeMap<String, u64> {
        self.counts
    }
}

impl FromIterator<(String, u64)> for RegionAggregate {
    fn from_iter<T: IntoIterator<Item = (String, u64)>>(iter: T) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

/// Count records per canonical region. Records with an empty `state` are skipped.
pub fn group_by_region<'a, I>(records: I) -> RegionAggregate
where
    I: IntoIterator<Item = &'a IncidentRecord>,
{
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    let mut skipped = 0usize;
    for r in records {
        if !r.has_region() {
            skipped += 1;
            continue;
        }
        *counts.entry(r.state.clone()).or_default() += 1;
    }
    debug!("Grouped by region - regions={}, skipped_no_region={}", counts.len(), skipped);
    RegionAggregate { counts }
}
