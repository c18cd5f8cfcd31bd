use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::record::IncidentRecord;

/// A single facet constraint. Serialized as a plain string, where the
/// empty string is the wildcard. `Exact("")` behaves as `Any` everywhere,
/// including equality.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FacetValue {
    #[default]
    Any,
    Exact(String),
}

impl FacetValue {
    pub fn exact(v: impl Into<String>) -> Self {
        FacetValue::from(v.into())
    }

    pub fn is_any(&self) -> bool {
        self.as_exact().is_none()
    }

    pub fn as_exact(&self) -> Option<&str> {
        match self {
            FacetValue::Exact(v) if !v.is_empty() => Some(v),
            _ => None,
        }
    }
}

impl PartialEq for FacetValue {
    fn eq(&self, other: &Self) -> bool {
        self.as_exact() == other.as_exact()
    }
}

impl Eq for FacetValue {}

impl Hash for FacetValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_exact().hash(state);
    }
}

impl From<String> for FacetValue {
    fn from(s: String) -> Self {
        if s.is_empty() {
            FacetValue::Any
        } else {
            FacetValue::Exact(s)
        }
    }
}

impl From<&str> for FacetValue {
    fn from(s: &str) -> Self {
        FacetValue::from(s.to_string())
    }
}

impl From<FacetValue> for String {
    fn from(v: FacetValue) -> Self {
        match v {
            FacetValue::Exact(s) => s,
            FacetValue::Any => String::new(),
        }
    }
}

impl fmt::Display for FacetValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_exact().unwrap_or(""))
    }
}

/// Filterable incident attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    Year,
    Gender,
    VictimRace,
    OfficerRace,
    DeathCause,
    VictimArmedStatus,
}

impl Facet {
    pub const ALL: [Facet; 6] = [
        Facet::Year,
        Facet::Gender,
        Facet::VictimRace,
        Facet::OfficerRace,
        Facet::DeathCause,
        Facet::VictimArmedStatus,
    ];

    /// The record field this facet reads.
    pub fn value_of(self, r: &IncidentRecord) -> &str {
        match self {
            Facet::Year => &r.year,
            Facet::Gender => &r.gender,
            Facet::VictimRace => &r.victim_race,
            Facet::OfficerRace => &r.officer_races,
            Facet::DeathCause => &r.death_cause,
            Facet::VictimArmedStatus => &r.victim_armed_status,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Facet::Year => "year",
            Facet::Gender => "gender",
            Facet::VictimRace => "victim_race",
            Facet::OfficerRace => "officer_race",
            Facet::DeathCause => "death_cause",
            Facet::VictimArmedStatus => "victim_armed_status",
        }
    }
}

/// Six independent facet predicates, combined with AND.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSpec {
    pub year: FacetValue,
    pub gender: FacetValue,
    pub victim_race: FacetValue,
    pub officer_race: FacetValue,
    pub death_cause: FacetValue,
    pub victim_armed_status: FacetValue,
}

impl FilterSpec {
    /// All facets wildcard.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn with(mut self, facet: Facet, value: impl Into<FacetValue>) -> Self {
        *self.slot_mut(facet) = value.into();
        self
    }

    pub fn get(&self, facet: Facet) -> &FacetValue {
        match facet {
            Facet::Year => &self.year,
            Facet::Gender => &self.gender,
            Facet::VictimRace => &self.victim_race,
            Facet::OfficerRace => &self.officer_race,
            Facet::DeathCause => &self.death_cause,
            Facet::VictimArmedStatus => &self.victim_armed_status,
        }
    }

    fn slot_mut(&mut self, facet: Facet) -> &mut FacetValue {
        match facet {
            Facet::Year => &mut self.year,
            Facet::Gender => &mut self.gender,
            Facet::VictimRace => &mut self.victim_race,
            Facet::OfficerRace => &mut self.officer_race,
            Facet::DeathCause => &mut self.death_cause,
            Facet::VictimArmedStatus => &mut self.victim_armed_status,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        Facet::ALL.iter().all(|f| self.get(*f).is_any())
    }

    pub fn matches(&self, r: &IncidentRecord) -> bool {
        Facet::ALL.iter().all(|&facet| match self.get(facet).as_exact() {
            None => true,
            Some(want) if facet == Facet::OfficerRace => lists_officer_race(&r.officer_races, want),
            Some(want) => facet.value_of(r) == want,
        })
    }
}

fn words(s: &str) -> impl Iterator<Item = &str> {
    s.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty())
}

/// Membership test for the free-text officer field: the wanted words must
/// appear as a contiguous run of whole words, ignoring case.
pub fn lists_officer_race(field: &str, want: &str) -> bool {
    let want: Vec<&str> = words(want).collect();
    if want.is_empty() {
        return false;
    }
    let have: Vec<&str> = words(field).collect();
    have.windows(want.len()).any(|win| {
        win.iter()
            .zip(&want)
            .all(|(a, b)| a.eq_ignore_ascii_case(b))
    })
}

/// Records matching `spec`, in input order.
pub fn apply<'a>(records: &'a [IncidentRecord], spec: &FilterSpec) -> Vec<&'a IncidentRecord> {
    if spec.is_wildcard() {
        return records.iter().collect();
    }
    records.iter().filter(|r| spec.matches(r)).collect()
}

/// Positions of matching records, ascending.
pub fn matching_positions(records: &[IncidentRecord], spec: &FilterSpec) -> Vec<usize> {
    if spec.is_wildcard() {
        return (0..records.len()).collect();
    }
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| spec.matches(r))
        .map(|(i, _)| i)
        .collect()
}
