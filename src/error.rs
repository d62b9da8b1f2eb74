//! Error types for the tag network analyzer

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// No co-occurrence pairs, or nothing survived thresholding
    #[error("empty graph: {0}")]
    EmptyGraph(String),

    /// Power iteration hit its bound without converging
    #[error("eigenvector centrality did not converge after {iterations} iterations")]
    Convergence { iterations: usize },

    #[error("invalid configuration value for '{name}': {message}")]
    InvalidConfig {
        name: &'static str,
        message: String,
    },

    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cache encoding error: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("Parquet error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    #[error("unsupported input format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;

impl AnalyzerError {
    /// Attach a path to an I/O error
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        AnalyzerError::Io {
            source,
            path: path.into(),
        }
    }
}

// Allow `?` on std::io::Error when no path is at hand.
impl From<std::io::Error> for AnalyzerError {
    fn from(source: std::io::Error) -> Self {
        AnalyzerError::Io {
            source,
            path: PathBuf::from("<unknown>"),
        }
    }
}
