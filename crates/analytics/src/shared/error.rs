use std::path::PathBuf;
use thiserror::Error;

/// Failures while reading source files
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Failures that abort a whole load-and-prepare run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("required table '{0}' was not loaded")]
    MissingTable(&'static str),

    #[error("table '{table}' has no column '{column}'")]
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },

    #[error(transparent)]
    Load(#[from] LoadError),
}
