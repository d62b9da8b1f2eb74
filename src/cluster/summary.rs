//! Community summaries and the induced community graph

use crate::cluster::metrics::density;
use crate::cluster::Community;
use crate::graph::TagGraph;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summarize every community of a partitioned graph.
///
/// Members are ordered by popularity, most popular first, with ties broken
/// by tag name. Nodes without a community id are skipped. Communities come
/// back ordered by id.
pub fn summarize_communities(graph: &TagGraph, top_howmany: usize) -> Vec<Community> {
    let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (idx, node) in graph.nodes().enumerate() {
        if let Some(community) = node.community {
            groups.entry(community).or_default().push(idx);
        }
    }

    let weighted = graph.to_weighted();

    let communities: Vec<Community> = groups
        .into_iter()
        .map(|(id, mut members)| {
            members.sort_by(|&a, &b| {
                let (na, nb) = (graph.node(a), graph.node(b));
                nb.popularity
                    .cmp(&na.popularity)
                    .then_with(|| na.tag.cmp(&nb.tag))
            });

            let tags: Vec<String> = members.iter().map(|&i| graph.node(i).tag.clone()).collect();
            Community {
                id,
                size: members.len(),
                density: density(&weighted, &members),
                popularity: members.iter().map(|&i| graph.node(i).popularity).sum(),
                top_tags: tags.iter().take(top_howmany).cloned().collect(),
                members: tags,
            }
        })
        .collect();

    log::info!("Summarized {} communities", communities.len());

    communities
}

/// One row of representative tags per community
pub fn top_tags_table(communities: &[Community]) -> Vec<Vec<String>> {
    communities.iter().map(|c| c.top_tags.clone()).collect()
}

/// A node of the induced graph: one community
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityNode {
    /// Community id
    pub community: usize,

    /// Readable label, set by [`InducedGraph::relabel`]
    pub label: Option<String>,

    /// Summed popularity of the community's members
    pub size: u64,
}

impl CommunityNode {
    /// Label if set, otherwise the community id
    pub fn name(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| self.community.to_string())
    }
}

/// Graph of communities: edge weights sum the tag edges crossing between
/// two communities. Never contains self-loops.
#[derive(Debug, Clone, Default)]
pub struct InducedGraph {
    graph: UnGraph<CommunityNode, f64>,
}

impl InducedGraph {
    /// Build the induced graph from community summaries and the partitioned
    /// tag graph. Induced node `k` stands for `communities[k]`.
    pub fn build(graph: &TagGraph, communities: &[Community]) -> Self {
        let mut induced = UnGraph::<CommunityNode, f64>::new_undirected();
        let mut node_of: BTreeMap<usize, NodeIndex> = BTreeMap::new();
        for community in communities {
            let idx = induced.add_node(CommunityNode {
                community: community.id,
                label: None,
                size: community.popularity,
            });
            node_of.insert(community.id, idx);
        }

        let mut crossing: BTreeMap<(NodeIndex, NodeIndex), f64> = BTreeMap::new();
        for (i, j, w) in graph.edges() {
            let (Some(ci), Some(cj)) = (graph.node(i).community, graph.node(j).community) else {
                continue;
            };
            if ci == cj {
                continue;
            }
            if let (Some(&a), Some(&b)) = (node_of.get(&ci), node_of.get(&cj)) {
                let key = if a < b { (a, b) } else { (b, a) };
                *crossing.entry(key).or_insert(0.0) += w;
            }
        }

        for ((a, b), w) in crossing {
            induced.add_edge(a, b, w);
        }

        log::info!(
            "Induced graph has {} communities and {} edges",
            induced.node_count(),
            induced.edge_count()
        );

        Self { graph: induced }
    }

    /// Label each community with its first `top_labels` representative tags
    pub fn relabel(&mut self, communities: &[Community], top_labels: usize, separator: &str) {
        let labels: BTreeMap<usize, String> = communities
            .iter()
            .map(|c| {
                let label = c
                    .top_tags
                    .iter()
                    .take(top_labels)
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(separator);
                (c.id, label)
            })
            .collect();

        for node in self.graph.node_weights_mut() {
            node.label = labels.get(&node.community).cloned();
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &CommunityNode> {
        self.graph.node_weights()
    }

    /// Edges as `(i, j, weight)` induced node indices
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.graph
            .edge_references()
            .map(|e| (e.source().index(), e.target().index(), *e.weight()))
    }

    /// Weight between two communities, looked up by community id
    pub fn weight(&self, a: usize, b: usize) -> Option<f64> {
        let find = |id: usize| {
            self.graph
                .node_indices()
                .find(|&idx| self.graph[idx].community == id)
        };
        let edge = self.graph.find_edge(find(a)?, find(b)?)?;
        Some(self.graph[edge])
    }

    pub fn has_self_loops(&self) -> bool {
        self.graph.edge_references().any(|e| e.source() == e.target())
    }
}
