//! Community analysis module

pub mod detection;
pub mod metrics;
pub mod summary;

pub use detection::{CommunityDetection, LouvainDetector};
pub use summary::InducedGraph;

use serde::{Deserialize, Serialize};

/// A detected community of tags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Community {
    /// Community id, as assigned by detection
    pub id: usize,

    /// Member tags, most popular first
    pub members: Vec<String>,

    /// Number of member tags
    pub size: usize,

    /// Density: internal edges / possible member pairs
    pub density: f64,

    /// Summed popularity of all members
    pub popularity: u64,

    /// Representative tags: the first `top_howmany` members
    pub top_tags: Vec<String>,
}
