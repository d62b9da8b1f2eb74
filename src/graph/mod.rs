//! Tag graph representation and algorithms module

pub mod algorithms;
pub mod builder;
pub mod centrality;
pub mod compressed;

pub use compressed::WeightedGraph;

use crate::data::PopularityMap;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Attributes carried by each tag node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagNode {
    pub tag: String,

    /// Site-wide usage count of the tag
    pub popularity: u64,

    /// Eigenvector centrality, 0.0 until computed
    pub centrality: f64,

    /// Community id, absent until detection has run
    pub community: Option<usize>,
}

impl TagNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            popularity: 0,
            centrality: 0.0,
            community: None,
        }
    }
}

/// Undirected weighted tag graph.
///
/// Node indices are dense (`0..node_count`) and stable for the lifetime of
/// the graph, so per-node vectors from the algorithms line up with them.
#[derive(Debug, Clone, Default)]
pub struct TagGraph {
    graph: UnGraph<TagNode, f64>,
    index: HashMap<String, NodeIndex>,
}

impl TagGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the node for a tag
    pub fn get_or_create_node(&mut self, tag: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(tag) {
            return idx;
        }

        let idx = self.graph.add_node(TagNode::new(tag));
        self.index.insert(tag.to_string(), idx);
        idx
    }

    /// Add an undirected edge between two tags, creating nodes as needed
    pub fn add_edge(&mut self, a: &str, b: &str, weight: f64) {
        let ia = self.get_or_create_node(a);
        let ib = self.get_or_create_node(b);
        self.graph.update_edge(ia, ib, weight);
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn index_of(&self, tag: &str) -> Option<usize> {
        self.index.get(tag).map(|idx| idx.index())
    }

    pub fn node(&self, idx: usize) -> &TagNode {
        &self.graph[NodeIndex::new(idx)]
    }

    pub fn node_mut(&mut self, idx: usize) -> &mut TagNode {
        &mut self.graph[NodeIndex::new(idx)]
    }

    /// Node attributes looked up by tag name
    pub fn node_by_tag(&self, tag: &str) -> Option<&TagNode> {
        self.index.get(tag).map(|&idx| &self.graph[idx])
    }

    /// Nodes in index order
    pub fn nodes(&self) -> impl Iterator<Item = &TagNode> {
        self.graph.node_weights()
    }

    /// Edges as `(i, j, weight)` node indices
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.graph
            .edge_references()
            .map(|e| (e.source().index(), e.target().index(), *e.weight()))
    }

    /// Edge weight between two tags, if connected
    pub fn weight(&self, a: &str, b: &str) -> Option<f64> {
        let ia = *self.index.get(a)?;
        let ib = *self.index.get(b)?;
        self.graph.find_edge(ia, ib).map(|e| self.graph[e])
    }

    /// Number of neighbors of a node
    pub fn degree(&self, idx: usize) -> usize {
        self.graph.neighbors(NodeIndex::new(idx)).count()
    }

    /// Attach popularity counts; returns the number of tags missing from the map
    pub fn set_popularity(&mut self, popularity: &PopularityMap) -> usize {
        let mut missing = 0;
        for node in self.graph.node_weights_mut() {
            match popularity.get(&node.tag) {
                Some(&count) => node.popularity = count,
                None => {
                    node.popularity = 0;
                    missing += 1;
                }
            }
        }
        missing
    }

    /// Attach centrality scores in node index order
    pub fn set_centrality(&mut self, scores: &[f64]) {
        for (node, &score) in self.graph.node_weights_mut().zip(scores) {
            node.centrality = score;
        }
    }

    /// Attach community ids in node index order
    pub fn set_partition(&mut self, partition: &[usize]) {
        for (node, &community) in self.graph.node_weights_mut().zip(partition) {
            node.community = Some(community);
        }
    }

    /// Compressed adjacency for the numeric algorithms
    pub fn to_weighted(&self) -> WeightedGraph {
        let edges: Vec<(usize, usize, f64)> = self.edges().collect();
        WeightedGraph::from_edges(self.node_count(), &edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nodes_created_once() {
        let mut g = TagGraph::new();
        g.add_edge("rust", "cargo", 1.0);
        g.add_edge("cargo", "rust", 0.5);
        g.add_edge("rust", "tokio", 0.25);

        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.weight("cargo", "rust"), Some(0.5));
        assert_eq!(g.degree(g.index_of("rust").unwrap()), 2);
    }

    #[test]
    fn test_attributes() {
        let mut g = TagGraph::new();
        g.add_edge("a", "b", 1.0);

        let popularity: PopularityMap = [("a".to_string(), 42)].into_iter().collect();
        assert_eq!(g.set_popularity(&popularity), 1);
        g.set_centrality(&[0.6, 0.8]);
        assert!(g.nodes().all(|n| n.community.is_none()));
        g.set_partition(&[0, 0]);

        let a = g.node_by_tag("a").unwrap();
        assert_eq!(a.popularity, 42);
        assert_eq!(a.centrality, 0.6);
        assert_eq!(a.community, Some(0));
        assert_eq!(g.node_by_tag("b").unwrap().popularity, 0);
    }

    #[test]
    fn test_to_weighted() {
        let mut g = TagGraph::new();
        g.add_edge("a", "b", 1.0);
        g.add_edge("b", "c", 0.5);

        let w = g.to_weighted();
        assert_eq!(w.node_count, 3);
        assert_eq!(w.edge_count(), 2);
        assert!((w.total_weight() - 1.5).abs() < 1e-12);
    }
}
