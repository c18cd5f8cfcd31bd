//! Loader adapter layer: convert column-keyed rows into `incident_map_core::RawRow`.
//!
//! This module stays small:
//! - No IO (the caller owns CSV/file parsing)
//! - No domain rules beyond column lookup and coordinate parsing
//!
//! Loaders provide a `RowBuilder` (or use the provided `ColumnRowBuilder`) to map
//! `TabularRow`s into raw rows, then hand those to `normalize`.

use std::borrow::Cow;
use std::collections::HashMap;

use incident_map_core::{normalize, IncidentRecord, NormalizeError, RawRow};

/// A row from the outside world, keyed by column header.
#[derive(Clone, Debug, Default)]
pub struct TabularRow<'a> {
    pub cells: HashMap<Cow<'a, str>, Cow<'a, str>>,
}

impl<'a> TabularRow<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zip a header row with one data row. Extra cells on either side are ignored.
    pub fn from_pairs<H, V>(headers: &'a [H], values: &'a [V]) -> Self
    where
        H: AsRef<str>,
        V: AsRef<str>,
    {
        let cells = headers
            .iter()
            .zip(values)
            .map(|(h, v)| (Cow::Borrowed(h.as_ref().trim()), Cow::Borrowed(v.as_ref())))
            .collect();
        Self { cells }
    }

    /// Set a cell value.
    pub fn with_cell(mut self, column: impl Into<Cow<'a, str>>, value: impl Into<Cow<'a, str>>) -> Self {
        self.cells.insert(column.into(), value.into());
        self
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(|v| v.as_ref())
    }
}

/// Trait: map a `TabularRow` into a `RawRow`.
pub trait RowBuilder {
    fn build(&self, row: &TabularRow<'_>) -> Result<RawRow, NormalizeError>;
}

/// Reads the standard dataset columns. Blank optional cells become `None`;
/// `long` is accepted in place of `lon`.
#[derive(Clone, Debug, Default)]
pub struct ColumnRowBuilder;

impl ColumnRowBuilder {
    fn required<'r>(row: &'r TabularRow<'_>, column: &str) -> Result<&'r str, NormalizeError> {
        row.get(column)
            .ok_or_else(|| NormalizeError::MissingColumn(column.to_string()))
    }

    fn optional(row: &TabularRow<'_>, column: &str) -> Result<Option<String>, NormalizeError> {
        let cell = Self::required(row, column)?.trim();
        Ok((!cell.is_empty()).then(|| cell.to_string()))
    }

    fn coordinate(cell: &str) -> f64 {
        // Non-numeric cells surface as NaN and are rejected by normalization.
        cell.trim().parse::<f64>().unwrap_or(f64::NAN)
    }
}

impl RowBuilder for ColumnRowBuilder {
    fn build(&self, row: &TabularRow<'_>) -> Result<RawRow, NormalizeError> {
        let text = |col: &str| Self::required(row, col).map(|s| s.trim().to_string());
        let lon_cell = || {
            row.get("lon")
                .or_else(|| row.get("long"))
                .ok_or_else(|| NormalizeError::MissingColumn("lon".to_string()))
        };

        Ok(RawRow {
            id: text("id")?,
            name: text("name")?,
            date: text("date")?,
            lat: Self::coordinate(Self::required(row, "lat")?),
            lon: Self::coordinate(lon_cell()?),
            city: text("city")?,
            state: text("state")?,
            gender: text("gender")?,
            race: text("race")?,
            officer_races: Self::optional(row, "officer_races")?,
            death_cause: text("death_cause")?,
            v_armed: text("v_armed")?,
            age: Self::optional(row, "age")?,
            circumstances: Self::optional(row, "circumstances")?,
        })
    }
}

/// Helper: build raw rows for a batch. The first failure aborts.
pub fn build_raw_rows<B: RowBuilder>(builder: &B, rows: &[TabularRow<'_>]) -> Result<Vec<RawRow>, NormalizeError> {
    rows.iter().map(|r| builder.build(r)).collect()
}

/// Adapter + normalization in one step.
pub fn load_records<B: RowBuilder>(builder: &B, rows: &[TabularRow<'_>]) -> Result<Vec<IncidentRecord>, NormalizeError> {
    normalize(build_raw_rows(builder, rows)?)
}
