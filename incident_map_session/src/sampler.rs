//! Stable, bounded sampling for the individual-incident view.
//!
//! A `SamplerSession` remembers the last drawn selection so a renderer can
//! redraw as often as it likes without the markers moving. Only `refresh`
//! draws again.

use rand::seq::index;
use rand::Rng;
use tracing::debug;

use incident_map_core::{matching_positions, Dataset, FilterSpec, IncidentRecord};

pub const DEFAULT_SAMPLE_CAP: usize = 70;

/// Pick at most `cap` distinct positions in `0..len`.
///
/// When `len <= cap` every position is returned in order and the RNG is not
/// touched. Otherwise positions are drawn uniformly without replacement,
/// in draw order.
pub fn sample_positions<R: Rng + ?Sized>(rng: &mut R, len: usize, cap: usize) -> Vec<usize> {
    if len <= cap {
        return (0..len).collect();
    }
    index::sample(rng, len, cap).into_vec()
}

/// The records a session currently shows: positions into a shared `Dataset`.
#[derive(Clone, Debug, Default)]
pub struct SampleSelection {
    dataset: Dataset,
    positions: Vec<usize>,
    spec: FilterSpec,
    matched: usize,
}

impl SampleSelection {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Dataset positions, in selection order.
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// The filter this selection was drawn under.
    pub fn spec(&self) -> &FilterSpec {
        &self.spec
    }

    /// How many records matched the filter before capping.
    pub fn matched(&self) -> usize {
        self.matched
    }

    pub fn records(&self) -> impl Iterator<Item = &IncidentRecord> + '_ {
        self.positions.iter().map(move |&i| &self.dataset[i])
    }

    /// Same dataset, same positions, same order.
    pub fn same_as(&self, other: &SampleSelection) -> bool {
        self.dataset.same_as(&other.dataset) && self.positions == other.positions
    }
}

/// Per-user sampler. Owned by exactly one session; not internally locked.
#[derive(Debug)]
pub struct SamplerSession<R> {
    rng: R,
    cap: usize,
    selection: SampleSelection,
}

impl<R: Rng> SamplerSession<R> {
    /// Empty session; `current()` is empty until the first `refresh`.
    /// A `cap` of zero is raised to 1; validated configs never pass one.
    pub fn new(rng: R, cap: usize) -> Self {
        Self {
            rng,
            cap: cap.max(1),
            selection: SampleSelection::default(),
        }
    }

    /// Session seeded with an unfiltered draw over `dataset`.
    pub fn open(dataset: &Dataset, rng: R, cap: usize) -> Self {
        let mut session = Self::new(rng, cap);
        session.refresh(dataset, &FilterSpec::any());
        session
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Draw up to `cap` records from `records` without touching stored state.
    pub fn draw<'a>(&mut self, records: &'a [IncidentRecord]) -> Vec<&'a IncidentRecord> {
        sample_positions(&mut self.rng, records.len(), self.cap)
            .into_iter()
            .map(|i| &records[i])
            .collect()
    }

    /// Filter, draw, and replace the stored selection.
    pub fn refresh(&mut self, dataset: &Dataset, spec: &FilterSpec) -> &SampleSelection {
        let matching = matching_positions(dataset, spec);
        let positions: Vec<usize> = sample_positions(&mut self.rng, matching.len(), self.cap)
            .into_iter()
            .map(|p| matching[p])
            .collect();
        debug!(
            "Sample refreshed - matched={}, drawn={}, cap={}",
            matching.len(),
            positions.len(),
            self.cap
        );
        self.selection = SampleSelection {
            dataset: dataset.clone(),
            positions,
            spec: spec.clone(),
            matched: matching.len(),
        };
        &self.selection
    }

    /// Stored selection; never recomputed.
    pub fn current(&self) -> &SampleSelection {
        &self.selection
    }
}
