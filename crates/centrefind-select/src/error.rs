use centrefind_core::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SelectError {
    #[error("failed to open source '{source_name}' at {path}: {source}")]
    SourceIo {
        source_name: String,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read CSV for source '{source_name}': {source}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },

    #[error(
        "source '{source_name}' is missing required column {column} (accepted headers: {accepted})"
    )]
    MissingColumn {
        source_name: String,
        column: &'static str,
        accepted: String,
    },

    #[error("source '{0}' was supplied more than once")]
    DuplicateSource(String),

    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
