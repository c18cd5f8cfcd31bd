//! Raw rows -> canonical `IncidentRecord`s.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use tracing::{debug, info, warn};

use crate::error::NormalizeError;
use crate::record::{IncidentRecord, RawRow};
use crate::regions;

pub const UNKNOWN: &str = "Unknown";

/// Columns the external loader must provide.
pub const REQUIRED_COLUMNS: [&str; 14] = [
    "id",
    "name",
    "date",
    "lat",
    "lon",
    "city",
    "state",
    "gender",
    "race",
    "officer_races",
    "death_cause",
    "v_armed",
    "age",
    "circumstances",
];

/// Verify a header row carries every required column. `long` stands in for `lon`.
pub fn check_columns<S: AsRef<str>>(headers: &[S]) -> Result<(), NormalizeError> {
    for col in REQUIRED_COLUMNS {
        let present = headers.iter().any(|h| {
            let h = h.as_ref().trim();
            h == col || (col == "lon" && h == "long")
        });
        if !present {
            return Err(NormalizeError::MissingColumn(col.to_string()));
        }
    }
    Ok(())
}

/// Map source race labels onto the canonical vocabulary. Idempotent.
pub fn canonical_race(raw: &str) -> &str {
    match raw {
        "Unknown race" => UNKNOWN,
        "Native Hawaiian and Pacific Islander" => "Pacific Islander",
        other => other,
    }
}

/// Title-case like Python's `str.title`: a letter following a letter is
/// lower-cased, any other letter is upper-cased.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_letter = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_letter = true;
        } else {
            out.push(ch);
            prev_letter = false;
        }
    }
    out
}

/// Parse the date forms seen in the source data.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    for fmt in ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

/// Integer ages, also accepting an integral decimal such as `"45.0"`.
pub fn parse_age(raw: &str) -> Option<u32> {
    let s = raw.trim();
    if let Ok(n) = s.parse::<u32>() {
        return Some(n);
    }
    let f = s.parse::<f64>().ok()?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 {
        Some(f as u32)
    } else {
        None
    }
}

fn or_unknown(cell: Option<String>) -> String {
    match cell {
        Some(s) if !s.trim().is_empty() => s,
        _ => UNKNOWN.to_string(),
    }
}

/// Normalize a single row. Returns the record and whether its state
/// abbreviation was recognised.
pub fn normalize_row(row: RawRow) -> Result<(IncidentRecord, bool), NormalizeError> {
    let date = parse_date(&row.date).ok_or_else(|| NormalizeError::InvalidDate {
        id: row.id.clone(),
        raw: row.date.clone(),
    })?;

    if !row.lat.is_finite() || !row.lon.is_finite() {
        return Err(NormalizeError::InvalidCoordinate {
            id: row.id,
            lat: row.lat,
            lon: row.lon,
        });
    }

    let state = regions::full_name(&row.state);
    if state.is_none() {
        debug!("unmapped state - id={}, state={:?}", row.id, row.state);
    }

    let record = IncidentRecord {
        year: format!("{:04}", date.year()),
        date,
        state: state.unwrap_or_default().to_string(),
        victim_race: canonical_race(&row.race).to_string(),
        officer_races: title_case(&or_unknown(row.officer_races)),
        circumstances: or_unknown(row.circumstances),
        age: row.age.as_deref().and_then(parse_age),
        id: row.id,
        name: row.name,
        city: row.city,
        lat: row.lat,
        lon: row.lon,
        gender: row.gender,
        death_cause: row.death_cause,
        victim_armed_status: row.v_armed,
    };
    Ok((record, state.is_some()))
}

/// Normalize a whole load. The first malformed row aborts.
pub fn normalize<I>(rows: I) -> Result<Vec<IncidentRecord>, NormalizeError>
where
    I: IntoIterator<Item = RawRow>,
{
    let mut out = Vec::new();
    let mut unmapped = 0usize;
    for row in rows {
        let (record, mapped) = normalize_row(row).inspect_err(|e| warn!("load aborted - {}", e))?;
        if !mapped {
            unmapped += 1;
        }
        out.push(record);
    }
    info!("Normalized records - rows={}, unmapped_states={}", out.len(), unmapped);
    Ok(out)
}
