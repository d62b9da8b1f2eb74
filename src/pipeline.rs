//! End-to-end analysis: tag sets in, annotated graphs and summaries out

use crate::cluster::detection::{CommunityDetection, LouvainDetector};
use crate::cluster::summary::{summarize_communities, InducedGraph};
use crate::cluster::Community;
use crate::config::Config;
use crate::data::cooccurrence::count_pairs;
use crate::data::Dataset;
use crate::error::Result;
use crate::graph::builder::GraphAssembler;
use crate::graph::centrality::compute_centrality;
use crate::graph::TagGraph;

/// Graph plus everything derived from its communities
#[derive(Debug, Clone)]
pub struct CommunityAnalysis {
    /// Tag graph with popularity, centrality and community attributes
    pub graph: TagGraph,

    pub detection: CommunityDetection,

    /// One summary per community, ordered by id
    pub communities: Vec<Community>,

    /// Labeled community graph
    pub induced: InducedGraph,
}

/// What a pipeline run produced, depending on `Config::detect_communities`
#[derive(Debug, Clone)]
pub enum PipelineOutput {
    GraphOnly(TagGraph),
    WithCommunities(CommunityAnalysis),
}

impl PipelineOutput {
    pub fn graph(&self) -> &TagGraph {
        match self {
            PipelineOutput::GraphOnly(graph) => graph,
            PipelineOutput::WithCommunities(analysis) => &analysis.graph,
        }
    }
}

/// Build the pruned tag graph annotated with popularity and centrality
pub fn build_tag_graph(dataset: &Dataset, config: &Config) -> Result<TagGraph> {
    config.validate()?;

    let counts = count_pairs(&dataset.tag_sets);
    let mut graph = GraphAssembler::from_config(config).assemble(&counts)?;

    let missing = graph.set_popularity(&dataset.popularity);
    if missing > 0 {
        log::warn!("{} tags have no popularity count; using 0", missing);
    }

    let weighted = graph.to_weighted();
    let centrality = compute_centrality(&weighted, &config.centrality)?;
    graph.set_centrality(&centrality);

    Ok(graph)
}

/// Build the tag graph, then partition it and summarize the communities
pub fn analyze_communities(dataset: &Dataset, config: &Config) -> Result<CommunityAnalysis> {
    let mut graph = build_tag_graph(dataset, config)?;

    let detection = LouvainDetector::from_config(&config.community).detect(&graph.to_weighted());
    match detection.modularity {
        Some(q) => log::info!("Modularity: {:.6}", q),
        None => log::warn!("Trivial partition; modularity is undefined"),
    }
    graph.set_partition(&detection.partition);

    let communities = summarize_communities(&graph, config.top_howmany);
    let mut induced = InducedGraph::build(&graph, &communities);
    induced.relabel(&communities, config.top_labels, &config.label_separator);

    Ok(CommunityAnalysis {
        graph,
        detection,
        communities,
        induced,
    })
}

/// Run whichever operation the configuration selects
pub fn run(dataset: &Dataset, config: &Config) -> Result<PipelineOutput> {
    if config.detect_communities {
        analyze_communities(dataset, config).map(PipelineOutput::WithCommunities)
    } else {
        log::info!("Community detection disabled; building the graph only");
        build_tag_graph(dataset, config).map(PipelineOutput::GraphOnly)
    }
}
