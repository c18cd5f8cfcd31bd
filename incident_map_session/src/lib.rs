//! incident_map_session
//!
//! Outside-world facing layer for `incident_map_core`.
//!
//! Responsibilities:
//! - convert loader rows into `RawRow`s via adapters
//! - own per-session `SamplerSession` state (stable samples across redraws)
//! - shard sessions by id (deterministic)
//! - shape results into renderer-facing map views
//!
//! Non-goals:
//! - no IO
//! - no async
//! - no persistence across restarts

pub mod adapter;
pub mod sampler;
pub mod views;
pub mod registry;

pub use adapter::{
    TabularRow,
    RowBuilder,
    ColumnRowBuilder,
    build_raw_rows,
    load_records,
};

pub use sampler::{
    SamplerSession,
    SampleSelection,
    sample_positions,
    DEFAULT_SAMPLE_CAP,
};

pub use views::{
    IndividualMapView,
    Marker,
    Popup,
    RegionMapView,
    RegionRow,
    annotate_boundaries,
    boundary_names,
    format_thousands,
    incident_label,
    NO_DATA_MESSAGE,
};

pub use registry::SessionRegistry;
