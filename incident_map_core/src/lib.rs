pub mod regions;
pub mod record;
pub mod error;
pub mod cfg;

pub mod normalize;
pub mod filter;
pub mod aggregate;
pub mod facets;
pub mod distribution;

pub use record::{RawRow, IncidentRecord, Dataset};
pub use error::{NormalizeError, ConfigError};
pub use cfg::{EngineCfg, Viewport};

pub use normalize::{normalize, normalize_row, check_columns, canonical_race, title_case, REQUIRED_COLUMNS, UNKNOWN};
pub use filter::{Facet, FacetValue, FilterSpec, apply, matching_positions};
pub use aggregate::{RegionAggregate, group_by_region};
pub use facets::FacetOptions;
pub use distribution::{AgeBin, counts_by, counts_by_among, age_histogram};
