//! Option lists for a filter UI. Every list starts with the wildcard.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::cfg::EngineCfg;
use crate::filter::{Facet, FacetValue};
use crate::record::IncidentRecord;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FacetOptions {
    pub year: Vec<FacetValue>,
    pub gender: Vec<FacetValue>,
    pub victim_race: Vec<FacetValue>,
    pub officer_race: Vec<FacetValue>,
    pub death_cause: Vec<FacetValue>,
    pub victim_armed_status: Vec<FacetValue>,
}

impl FacetOptions {
    pub fn from_records(records: &[IncidentRecord], cfg: &EngineCfg) -> Self {
        let years: BTreeSet<&str> = records
            .iter()
            .map(|r| r.year.as_str())
            .filter(|y| !y.is_empty())
            .collect();

        Self {
            year: with_wildcard(years.into_iter().rev()),
            gender: with_wildcard(most_frequent(records, Facet::Gender, cfg.gender_options)),
            victim_race: with_wildcard(distinct_in_order(records, Facet::VictimRace)),
            officer_race: with_wildcard(cfg.officer_race_vocabulary.iter().map(String::as_str)),
            death_cause: with_wildcard(most_frequent(records, Facet::DeathCause, cfg.death_cause_options)),
            victim_armed_status: with_wildcard(most_frequent(
                records,
                Facet::VictimArmedStatus,
                cfg.armed_options,
            )),
        }
    }

    pub fn get(&self, facet: Facet) -> &[FacetValue] {
        match facet {
            Facet::Year => &self.year,
            Facet::Gender => &self.gender,
            Facet::VictimRace => &self.victim_race,
            Facet::OfficerRace => &self.officer_race,
            Facet::DeathCause => &self.death_cause,
            Facet::VictimArmedStatus => &self.victim_armed_status,
        }
    }
}

fn with_wildcard<'a, I>(values: I) -> Vec<FacetValue>
where
    I: IntoIterator<Item = &'a str>,
{
    std::iter::once(FacetValue::Any)
        .chain(values.into_iter().map(FacetValue::from))
        .collect()
}

fn distinct_in_order(records: &[IncidentRecord], facet: Facet) -> Vec<&str> {
    let mut seen = BTreeSet::new();
    records
        .iter()
        .map(|r| facet.value_of(r))
        .filter(|v| !v.is_empty() && seen.insert(*v))
        .collect()
}

/// The `n` most frequent non-empty values; ties keep first-seen order.
pub fn most_frequent(records: &[IncidentRecord], facet: Facet, n: usize) -> Vec<&str> {
    // value -> (count, first position)
    let mut tally: HashMap<&str, (usize, usize)> = HashMap::new();
    for (pos, r) in records.iter().enumerate() {
        let v = facet.value_of(r);
        if v.is_empty() {
            continue;
        }
        tally.entry(v).or_insert((0, pos)).0 += 1;
    }
    let mut ranked: Vec<(&str, (usize, usize))> = tally.into_iter().collect();
    ranked.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1)));
    ranked.into_iter().take(n).map(|(v, _)| v).collect()
}
