//! Sharded session registry.
//!
//! The outside-world facing layer around `incident_map_core`:
//! - owns one `SamplerSession` per session id
//! - shares a single read-only `Dataset` between all sessions
//! - answers region-view queries statelessly
//!
//! No IO. No async. Sessions never share mutable state; the shard locks only
//! guard the id -> session maps.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use incident_map_core::{
    apply, group_by_region, ConfigError, Dataset, EngineCfg, FacetOptions, FilterSpec, RegionAggregate,
};

use crate::sampler::SamplerSession;
use crate::views::{IndividualMapView, RegionMapView};

#[derive(Default, Debug)]
struct Shard {
    sessions: HashMap<String, SamplerSession<StdRng>>,
}

/// Deterministic FNV-1a hash (stable across runs).
fn fnv1a_u64(s: &str) -> u64 {
    let mut h: u64 = 0xcbf29ce484222325;
    for b in s.as_bytes() {
        h ^= *b as u64;
        h = h.wrapping_mul(0x100000001b3);
    }
    h
}

fn shard_index(session_id: &str, shard_count: usize) -> usize {
    if shard_count <= 1 {
        return 0;
    }
    (fnv1a_u64(session_id) as usize) % shard_count
}

/// A sharded registry. One entry is one user's `SamplerSession`.
///
/// `shards == 1` behaves like a single-threaded registry. Wrap the registry in
/// an `Arc` to serve sessions from several threads.
#[derive(Debug)]
pub struct SessionRegistry {
    cfg: EngineCfg,
    dataset: Dataset,
    options: FacetOptions,
    shards: usize,
    state_shards: Vec<Mutex<Shard>>,
}

impl SessionRegistry {
    /// Fails when `cfg` does not validate (e.g. a zero sample cap).
    pub fn new(dataset: Dataset, cfg: EngineCfg, shards: usize) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let shards = shards.max(1);
        let options = FacetOptions::from_records(&dataset, &cfg);
        let state_shards = (0..shards).map(|_| Mutex::new(Shard::default())).collect();
        Ok(Self {
            cfg,
            dataset,
            options,
            shards,
            state_shards,
        })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn cfg(&self) -> &EngineCfg {
        &self.cfg
    }

    /// Option lists for the filter UI, computed once at construction.
    pub fn facet_options(&self) -> &FacetOptions {
        &self.options
    }

    fn shard_for(&self, session_id: &str) -> MutexGuard<'_, Shard> {
        let idx = shard_index(session_id, self.shards);
        self.state_shards[idx]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn rng_for(&self, session_id: &str) -> StdRng {
        match self.cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed ^ fnv1a_u64(session_id)),
            None => StdRng::from_os_rng(),
        }
    }

    fn individual_view(&self, session: &SamplerSession<StdRng>) -> IndividualMapView {
        IndividualMapView::from_selection(session.current(), self.cfg.viewport)
    }

    /// Open a session (seeded with an unfiltered draw) or return the existing one.
    pub fn open(&self, session_id: &str) -> IndividualMapView {
        let mut guard = self.shard_for(session_id);
        if !guard.sessions.contains_key(session_id) {
            let session = SamplerSession::open(&self.dataset, self.rng_for(session_id), self.cfg.sample_cap);
            guard.sessions.insert(session_id.to_string(), session);
            info!("Session opened - id={}, active={}", session_id, guard.sessions.len());
        }
        let session = &guard.sessions[session_id];
        self.individual_view(session)
    }

    /// Resample one session under `spec`. Opens the session first if needed.
    pub fn refresh(&self, session_id: &str, spec: &FilterSpec) -> IndividualMapView {
        let mut guard = self.shard_for(session_id);
        let session = guard
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(|| SamplerSession::new(self.rng_for(session_id), self.cfg.sample_cap));
        session.refresh(&self.dataset, spec);
        self.individual_view(session)
    }

    /// The stored selection, or `None` for an unknown session.
    pub fn current(&self, session_id: &str) -> Option<IndividualMapView> {
        let guard = self.shard_for(session_id);
        guard.sessions.get(session_id).map(|s| self.individual_view(s))
    }

    /// Drop a session. Returns whether it existed.
    pub fn close(&self, session_id: &str) -> bool {
        let removed = self.shard_for(session_id).sessions.remove(session_id).is_some();
        if removed {
            info!("Session closed - id={}", session_id);
        }
        removed
    }

    pub fn session_count(&self) -> usize {
        self.state_shards
            .iter()
            .map(|s| s.lock().unwrap_or_else(PoisonError::into_inner).sessions.len())
            .sum()
    }

    /// Per-region counts under `spec`. Stateless.
    pub fn aggregate(&self, spec: &FilterSpec) -> RegionAggregate {
        group_by_region(apply(&self.dataset, spec))
    }

    /// Choropleth join for `spec` against the boundary dataset's region names.
    pub fn region_view<'a, I>(&self, spec: &FilterSpec, boundary_names: I) -> RegionMapView
    where
        I: IntoIterator<Item = &'a str>,
    {
        let matched = apply(&self.dataset, spec);
        let aggregate = group_by_region(matched.iter().copied());
        RegionMapView::join(&aggregate, matched.len(), boundary_names, self.cfg.viewport)
    }
}
