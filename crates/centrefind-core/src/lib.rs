//! Shared configuration and domain types for the centre finder.

pub mod app_config;
pub mod config;
pub mod facilities;
pub mod sources;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use facilities::{
    ConsolidatedRecord, FacilityRecord, QueryPoint, RankedFacility, SourceTable,
};
pub use sources::{
    load_sources, ColumnMapping, ConsolidationPolicy, PolicyToggles, SourceConfig, SourcesFile,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read {path}: {source}")]
    FileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    YamlParse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("config validation failed: {0}")]
    Validation(String),
}
