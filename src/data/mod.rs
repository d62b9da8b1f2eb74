//! Input data model and loaders

pub mod cooccurrence;
pub mod input;
pub mod parquet;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tags attached to one question; may contain duplicates until counted
pub type TagSet = Vec<String>;

/// Tag usage counts across the whole site
pub type PopularityMap = HashMap<String, u64>;

/// Everything the analysis consumes from the upstream collector
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub tag_sets: Vec<TagSet>,
    pub popularity: PopularityMap,
}

impl Dataset {
    pub fn new(tag_sets: Vec<TagSet>, popularity: PopularityMap) -> Self {
        Self {
            tag_sets,
            popularity,
        }
    }
}
