//! Tag co-occurrence network analysis: weighted tag graphs, eigenvector
//! centrality, Louvain communities and community summaries

pub mod cluster;
pub mod config;
pub mod data;
pub mod error;
pub mod graph;
pub mod pipeline;
pub mod storage;

pub use config::Config;
pub use error::{AnalyzerError, Result};
pub use pipeline::{analyze_communities, build_tag_graph, run, CommunityAnalysis, PipelineOutput};
