use gbkit_core::LocationError;
use thiserror::Error;

/// Errors raised while adapting a record. Validation errors are reported before
/// any identifier is consumed; semantic errors abort the record part way.
#[derive(Error, Debug)]
pub enum AdapterError {
    // structural preconditions
    #[error("record is missing {0}")]
    MissingField(&'static str),

    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("feature #{index} is malformed: {reason}")]
    InvalidFeature { index: usize, reason: String },

    // semantic violations
    #[error("two gene features share the location {0}")]
    DuplicateGeneLocation(String),

    #[error("{key} at {location} does not overlap its gene at {gene_location}")]
    CognateDoesNotOverlap {
        key: String,
        location: String,
        gene_location: String,
    },

    #[error("{key} at {location}: {source}")]
    FeatureLocation {
        key: String,
        location: String,
        #[source]
        source: LocationError,
    },

    #[error(transparent)]
    Location(#[from] LocationError),
}

impl AdapterError {
    /// True for errors raised by the upfront validation pass.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AdapterError::MissingField(_)
                | AdapterError::InvalidField { .. }
                | AdapterError::InvalidFeature { .. }
        )
    }
}

/// Errors loading an [crate::config::AdapterConfig].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Adapter config must be a `.toml` file")]
    InvalidFileType,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, AdapterError>;
