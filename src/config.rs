//! Configuration management for the tag network analyzer

use crate::error::{AnalyzerError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Power iteration settings for eigenvector centrality
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CentralityConfig {
    /// Convergence tolerance (scaled by node count)
    pub tolerance: f64,

    /// Upper bound on power iterations
    pub max_iterations: usize,

    /// Recompute per connected component when the global iteration fails
    pub fallback: bool,
}

impl Default for CentralityConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            max_iterations: 100,
            fallback: true,
        }
    }
}

/// Louvain settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommunityConfig {
    /// Maximum local-move passes per level
    pub max_passes: usize,

    /// Maximum aggregation levels
    pub max_levels: usize,

    /// Minimum modularity improvement required to keep aggregating
    pub min_modularity_gain: f64,
}

impl Default for CommunityConfig {
    fn default() -> Self {
        Self {
            max_passes: 100,
            max_levels: 10,
            min_modularity_gain: 1e-7,
        }
    }
}

/// Default configuration for the tag network analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Minimum co-occurrence count for an edge to be kept
    pub edge_slicing_threshold: usize,

    /// Minimum degree for a node to survive when the graph is over the node limit
    pub node_slicing_threshold: usize,

    /// Soft cap on the node count; `None` disables the degree filter
    pub node_limit: Option<usize>,

    /// Number of representative tags per community
    pub top_howmany: usize,

    /// Number of representative tags used for induced graph labels
    pub top_labels: usize,

    /// Separator between tags in induced graph labels
    pub label_separator: String,

    /// Run community detection and summarization after building the graph
    pub detect_communities: bool,

    pub centrality: CentralityConfig,

    pub community: CommunityConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            edge_slicing_threshold: 6,
            node_slicing_threshold: 8,
            node_limit: Some(1000),
            top_howmany: 5,
            top_labels: 2,
            label_separator: ", ".to_string(),
            detect_communities: true,
            centrality: CentralityConfig::default(),
            community: CommunityConfig::default(),
        }
    }
}

impl Config {
    /// Load a configuration from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| AnalyzerError::io(e, path))?;
        let config: Config = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject unusable values before any computation starts.
    ///
    /// Counts and limits are unsigned, so negative values never reach this point;
    /// JSON input with a negative value fails at deserialization instead.
    pub fn validate(&self) -> Result<()> {
        if self.top_howmany == 0 {
            return Err(invalid("top_howmany", "must be at least 1"));
        }
        if self.top_labels == 0 {
            return Err(invalid("top_labels", "must be at least 1"));
        }
        if self.top_labels > self.top_howmany {
            return Err(invalid(
                "top_labels",
                format!(
                    "cannot exceed top_howmany ({} > {})",
                    self.top_labels, self.top_howmany
                ),
            ));
        }
        if !self.centrality.tolerance.is_finite() || self.centrality.tolerance <= 0.0 {
            return Err(invalid("centrality.tolerance", "must be a positive finite number"));
        }
        if self.centrality.max_iterations == 0 {
            return Err(invalid("centrality.max_iterations", "must be at least 1"));
        }
        if self.community.max_passes == 0 {
            return Err(invalid("community.max_passes", "must be at least 1"));
        }
        if self.community.max_levels == 0 {
            return Err(invalid("community.max_levels", "must be at least 1"));
        }
        let gain = self.community.min_modularity_gain;
        if !gain.is_finite() || gain < 0.0 {
            return Err(invalid(
                "community.min_modularity_gain",
                "must be a non-negative finite number",
            ));
        }

        Ok(())
    }
}

fn invalid(name: &'static str, message: impl Into<String>) -> AnalyzerError {
    AnalyzerError::InvalidConfig {
        name,
        message: message.into(),
    }
}
