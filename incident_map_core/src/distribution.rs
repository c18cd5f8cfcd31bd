// ---------------------------------------------------------------------
// Raw counts behind the summary charts. Plotting lives elsewhere.
// ---------------------------------------------------------------------

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::filter::Facet;
use crate::record::IncidentRecord;

/// Count of records per facet value, keyed in value order.
pub fn counts_by(records: &[IncidentRecord], facet: Facet) -> BTreeMap<String, usize> {
    let mut out = BTreeMap::new();
    for r in records {
        *out.entry(facet.value_of(r).to_string()).or_insert(0) += 1;
    }
    out
}

/// Like `counts_by`, keeping only the listed values.
pub fn counts_by_among(records: &[IncidentRecord], facet: Facet, allowed: &[&str]) -> BTreeMap<String, usize> {
    let mut out = counts_by(records, facet);
    out.retain(|k, _| allowed.contains(&k.as_str()));
    out
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgeBin {
    pub lo: f64,
    pub hi: f64,
    pub count: usize,
}

/// Equal-width histogram over known ages. The last bin includes its upper edge.
pub fn age_histogram(records: &[IncidentRecord], bins: usize) -> Vec<AgeBin> {
    let ages: Vec<f64> = records.iter().filter_map(|r| r.age).map(f64::from).collect();
    if bins == 0 || ages.is_empty() {
        return Vec::new();
    }

    let min = ages.iter().copied().fold(f64::INFINITY, f64::min);
    let max = ages.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    // A single distinct age still gets a unit-wide range.
    let (lo, hi) = if min == max { (min - 0.5, max + 0.5) } else { (min, max) };
    let width = (hi - lo) / bins as f64;

    let mut out: Vec<AgeBin> = (0..bins)
        .map(|i| AgeBin {
            lo: lo + width * i as f64,
            hi: if i + 1 == bins { hi } else { lo + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();

    for a in ages {
        let idx = (((a - lo) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}
