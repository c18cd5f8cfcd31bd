//! Shapes handed to the external map renderer.
//!
//! No HTML, no geometry. The renderer templates popups, escapes text and draws
//! boundaries; these views only carry the data.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use incident_map_core::{IncidentRecord, RegionAggregate, Viewport};

use crate::sampler::SampleSelection;

pub const NO_DATA_MESSAGE: &str = "No data matches these filters.";

/// Popup contents for one marker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Popup {
    pub name: String,
    pub date: String,
    pub city: String,
    pub state: String,
    pub gender: String,
    pub victim_race: String,
    pub officer_races: String,
    pub victim_armed_status: String,
    pub circumstances: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// (lat, lon)
    pub coordinates: (f64, f64),
    pub popup: Popup,
}

impl From<&IncidentRecord> for Marker {
    fn from(r: &IncidentRecord) -> Self {
        Marker {
            coordinates: (r.lat, r.lon),
            popup: Popup {
                name: r.name.clone(),
                date: r.date_label(),
                city: r.city.clone(),
                state: r.state.clone(),
                gender: r.gender.clone(),
                victim_race: r.victim_race.clone(),
                officer_races: r.officer_races.clone(),
                victim_armed_status: r.victim_armed_status.clone(),
                circumstances: r.circumstances.clone(),
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndividualMapView {
    pub viewport: Viewport,
    pub markers: Vec<Marker>,
    /// Set when nothing matched; the renderer shows it instead of markers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl IndividualMapView {
    pub fn from_selection(selection: &SampleSelection, viewport: Viewport) -> Self {
        let markers: Vec<Marker> = selection.records().map(Marker::from).collect();
        let notice = markers.is_empty().then(|| NO_DATA_MESSAGE.to_string());
        Self {
            viewport,
            markers,
            notice,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

/// `1234567` -> `"1,234,567"`.
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Tooltip text for a region: `"Incidents: 1,234"`, or `"0"` when absent.
pub fn incident_label(count: Option<u64>) -> String {
    match count {
        Some(n) => format!("Incidents: {}", format_thousands(n)),
        None => "0".to_string(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRow {
    pub region_name: String,
    pub count: u64,
    pub display: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionMapView {
    pub viewport: Viewport,
    /// One row per boundary region, in boundary order.
    pub rows: Vec<RegionRow>,
    /// Aggregated regions with no boundary feature; not drawn.
    pub unjoined: Vec<(String, u64)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl RegionMapView {
    /// Join `aggregate` against the boundary dataset's region names.
    /// `matched` is the filter's record count before region grouping; the
    /// notice is set only when it is zero.
    pub fn join<'a, I>(aggregate: &RegionAggregate, matched: usize, boundary_names: I, viewport: Viewport) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let rows: Vec<RegionRow> = boundary_names
            .into_iter()
            .map(|name| {
                let count = aggregate.get(name);
                RegionRow {
                    region_name: name.to_string(),
                    count: count.unwrap_or(0),
                    display: incident_label(count),
                }
            })
            .collect();

        let unjoined: Vec<(String, u64)> = aggregate
            .iter()
            .filter(|(name, _)| !rows.iter().any(|r| r.region_name == *name))
            .map(|(name, n)| (name.to_string(), n))
            .collect();
        if !unjoined.is_empty() {
            debug!("Regions without boundary - count={}", unjoined.len());
        }

        Self {
            viewport,
            rows,
            unjoined,
            notice: (matched == 0).then(|| NO_DATA_MESSAGE.to_string()),
        }
    }

    pub fn row(&self, region_name: &str) -> Option<&RegionRow> {
        self.rows.iter().find(|r| r.region_name == region_name)
    }
}

/// Region names of a GeoJSON FeatureCollection (`features[].properties.name`).
pub fn boundary_names(geojson: &Value) -> Vec<&str> {
    features(geojson)
        .iter()
        .filter_map(|f| f.pointer("/properties/name").and_then(Value::as_str))
        .collect()
}

fn features(geojson: &Value) -> &[Value] {
    geojson
        .get("features")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Write `properties.incident` on every named feature. Geometry is untouched.
/// Returns the number of features annotated.
pub fn annotate_boundaries(geojson: &mut Value, aggregate: &RegionAggregate) -> usize {
    let Some(features) = geojson.get_mut("features").and_then(Value::as_array_mut) else {
        return 0;
    };
    let mut annotated = 0;
    for feature in features {
        let Some(props) = feature.get_mut("properties").and_then(Value::as_object_mut) else {
            continue;
        };
        let Some(name) = props.get("name").and_then(Value::as_str) else {
            continue;
        };
        let label = incident_label(aggregate.get(name));
        props.insert("incident".to_string(), Value::String(label));
        annotated += 1;
    }
    annotated
}
