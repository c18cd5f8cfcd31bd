/// Fatal load-time failures. The dataset is expected to be pre-validated,
/// so any of these aborts the whole load.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum NormalizeError {
    #[error("required column missing: {0}")]
    MissingColumn(String),
    #[error("record {id}: unparseable date {raw:?}")]
    InvalidDate { id: String, raw: String },
    #[error("record {id}: non-finite coordinate ({lat}, {lon})")]
    InvalidCoordinate { id: String, lat: f64, lon: f64 },
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
