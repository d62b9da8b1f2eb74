//! Louvain community detection
//!
//! Greedy modularity optimization in two alternating phases:
//!
//! 1. **Local moving**: every node starts alone; nodes are visited in index
//!    order and moved to the neighboring community with the largest
//!    modularity gain, until a full pass moves nothing.
//! 2. **Aggregation**: each community collapses into one node. Weights
//!    between communities are summed; weight inside a community becomes a
//!    self-loop on its node.
//!
//! Levels repeat until a pass merges nothing or modularity stops improving.
//! Local moves depend on earlier moves in the same pass, so this phase
//! stays sequential.

use crate::cluster::metrics::modularity;
use crate::config::CommunityConfig;
use crate::graph::WeightedGraph;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Gains below this are treated as ties to avoid float churn
const GAIN_EPSILON: f64 = 1e-12;

/// Result of community detection on a graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityDetection {
    /// Community id per node, numbered by first occurrence in node order
    pub partition: Vec<usize>,

    /// Number of communities
    pub community_count: usize,

    /// Modularity of the final partition; `None` for a trivial partition
    pub modularity: Option<f64>,

    /// Modularity after the first local-move phase; `None` when trivial
    pub first_pass_modularity: Option<f64>,

    /// Aggregation levels that were kept
    pub levels: usize,
}

impl CommunityDetection {
    /// One community holding every node, with modularity left undefined
    fn trivial(node_count: usize) -> Self {
        Self {
            partition: vec![0; node_count],
            community_count: usize::from(node_count > 0),
            modularity: None,
            first_pass_modularity: None,
            levels: 0,
        }
    }

    /// True when the graph had a single node or no edge weight
    pub fn is_trivial(&self) -> bool {
        self.modularity.is_none()
    }
}

/// Louvain community detector
#[derive(Debug, Clone, PartialEq)]
pub struct LouvainDetector {
    /// Maximum local-move passes per level
    max_passes: usize,

    /// Maximum aggregation levels
    max_levels: usize,

    /// Minimum modularity improvement to keep aggregating
    min_modularity_gain: f64,
}

impl LouvainDetector {
    pub fn new(max_passes: usize, max_levels: usize, min_modularity_gain: f64) -> Self {
        Self {
            max_passes,
            max_levels,
            min_modularity_gain,
        }
    }

    pub fn from_config(config: &CommunityConfig) -> Self {
        Self::new(
            config.max_passes,
            config.max_levels,
            config.min_modularity_gain,
        )
    }

    /// Partition the graph's nodes into communities.
    ///
    /// A graph with at most one node or no edge weight yields the trivial
    /// partition instead of an error.
    pub fn detect(&self, graph: &WeightedGraph) -> CommunityDetection {
        let n = graph.node_count;
        if n <= 1 || graph.total_weight() <= 0.0 {
            log::warn!(
                "Graph with {} nodes and no edge weight to optimize; returning a trivial partition",
                n
            );
            return CommunityDetection::trivial(n);
        }

        log::info!(
            "Detecting communities on {} nodes and {} edges",
            n,
            graph.edge_count()
        );

        // Original node -> node of the current aggregate graph
        let mut membership: Vec<usize> = (0..n).collect();
        let mut current = graph.clone();
        let mut best_modularity = modularity(graph, &membership);
        let mut first_pass_modularity = None;
        let mut levels = 0;

        for level in 0..self.max_levels {
            let (communities, moved) = self.local_move(&current);
            if !moved {
                log::debug!("Level {}: no node moved", level);
                break;
            }

            let (communities, community_count) = renumber(&communities);
            let flattened: Vec<usize> = membership.iter().map(|&a| communities[a]).collect();
            let q = modularity(graph, &flattened);

            log::debug!(
                "Level {}: {} -> {} communities, modularity {:.6}",
                level,
                current.node_count,
                community_count,
                q
            );

            if q < best_modularity {
                break;
            }
            first_pass_modularity.get_or_insert(q);

            let improvement = q - best_modularity;
            membership = flattened;
            best_modularity = q;
            levels += 1;

            if community_count == current.node_count || improvement < self.min_modularity_gain {
                break;
            }
            current = aggregate(&current, &communities, community_count);
        }

        let (partition, community_count) = renumber(&membership);

        log::info!(
            "Found {} communities over {} levels (modularity {:.6})",
            community_count,
            levels,
            best_modularity
        );

        CommunityDetection {
            partition,
            community_count,
            modularity: Some(best_modularity),
            first_pass_modularity: Some(first_pass_modularity.unwrap_or(best_modularity)),
            levels,
        }
    }

    /// Local-move phase. Returns the community of each node and whether
    /// any node moved.
    fn local_move(&self, graph: &WeightedGraph) -> (Vec<usize>, bool) {
        let n = graph.node_count;
        let two_m = 2.0 * graph.total_weight();

        let degrees: Vec<f64> = (0..n).map(|i| graph.weighted_degree(i)).collect();
        let mut community: Vec<usize> = (0..n).collect();
        let mut community_degrees = degrees.clone();

        // Scratch space reused across nodes
        let mut link_weight = vec![0.0; n];
        let mut seen = vec![false; n];
        let mut candidates: Vec<usize> = Vec::new();

        let mut any_moved = false;

        for _pass in 0..self.max_passes {
            let mut moves = 0;

            for node in 0..n {
                let own = community[node];
                let ki = degrees[node];

                // Own community first so ties keep the node in place
                candidates.push(own);
                seen[own] = true;
                for (neighbor, w) in graph.neighbors(node) {
                    let c = community[neighbor];
                    if !seen[c] {
                        seen[c] = true;
                        candidates.push(c);
                    }
                    link_weight[c] += w;
                }

                community_degrees[own] -= ki;

                // Gain of joining c, up to a positive factor: k_i,in - tot_c * k_i / 2m
                let mut best = own;
                let mut best_gain = link_weight[own] - community_degrees[own] * ki / two_m;
                for &c in &candidates[1..] {
                    let gain = link_weight[c] - community_degrees[c] * ki / two_m;
                    if gain > best_gain + GAIN_EPSILON {
                        best = c;
                        best_gain = gain;
                    }
                }

                community_degrees[best] += ki;
                if best != own {
                    community[node] = best;
                    moves += 1;
                }

                for &c in &candidates {
                    link_weight[c] = 0.0;
                    seen[c] = false;
                }
                candidates.clear();
            }

            if moves == 0 {
                break;
            }
            any_moved = true;
        }

        (community, any_moved)
    }
}

impl Default for LouvainDetector {
    fn default() -> Self {
        Self::from_config(&CommunityConfig::default())
    }
}

/// Renumber labels to `0..k` in order of first occurrence
pub fn renumber(labels: &[usize]) -> (Vec<usize>, usize) {
    let mut mapping: BTreeMap<usize, usize> = BTreeMap::new();
    let renumbered = labels
        .iter()
        .map(|&label| {
            let next = mapping.len();
            *mapping.entry(label).or_insert(next)
        })
        .collect();
    (renumbered, mapping.len())
}

/// Collapse each community into one node; internal weight becomes a self-loop
fn aggregate(graph: &WeightedGraph, communities: &[usize], community_count: usize) -> WeightedGraph {
    let mut self_loops = vec![0.0; community_count];
    for (node, &loop_weight) in graph.self_loops.iter().enumerate() {
        self_loops[communities[node]] += loop_weight;
    }

    let mut merged: BTreeMap<(usize, usize), f64> = BTreeMap::new();
    for (i, j, w) in graph.edges() {
        let ci = communities[i];
        let cj = communities[j];
        if ci == cj {
            self_loops[ci] += w;
        } else {
            let key = if ci < cj { (ci, cj) } else { (cj, ci) };
            *merged.entry(key).or_insert(0.0) += w;
        }
    }

    WeightedGraph::from_merged(community_count, merged, self_loops)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_triangles() -> WeightedGraph {
        WeightedGraph::from_edges(
            6,
            &[
                (0, 1, 1.0),
                (1, 2, 1.0),
                (0, 2, 1.0),
                (3, 4, 1.0),
                (4, 5, 1.0),
                (3, 5, 1.0),
                (2, 3, 1.0),
            ],
        )
    }

    fn assert_cover(detection: &CommunityDetection, n: usize) {
        assert_eq!(detection.partition.len(), n);
        let max = detection.partition.iter().copied().max().unwrap();
        assert_eq!(max + 1, detection.community_count);
        for c in 0..detection.community_count {
            assert!(detection.partition.contains(&c));
        }
    }

    #[test]
    fn test_two_triangles() {
        let detection = LouvainDetector::default().detect(&two_triangles());

        assert_cover(&detection, 6);
        assert_eq!(detection.partition, vec![0, 0, 0, 1, 1, 1]);
        let expected = 2.0 * (3.0 / 7.0 - 0.25);
        assert!((detection.modularity.unwrap() - expected).abs() < 1e-12);
        assert!(!detection.is_trivial());
    }

    #[test]
    fn test_weighted_triangle_merges() {
        // django - python 1.0, flask - python 0.5, django - flask 0.5
        let g = WeightedGraph::from_edges(3, &[(0, 2, 1.0), (1, 2, 0.5), (0, 1, 0.5)]);
        let detection = LouvainDetector::default().detect(&g);
        assert_eq!(detection.partition, vec![0, 0, 0]);
        assert!(detection.modularity.unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_ring_of_cliques_aggregates() {
        // Six 4-cliques joined in a ring by single edges
        let mut edges = Vec::new();
        for clique in 0..6 {
            let base = clique * 4;
            for a in 0..4 {
                for b in (a + 1)..4 {
                    edges.push((base + a, base + b, 1.0));
                }
            }
            let next = ((clique + 1) % 6) * 4;
            edges.push((base + 3, next, 1.0));
        }
        let g = WeightedGraph::from_edges(24, &edges);
        let detection = LouvainDetector::default().detect(&g);

        assert_cover(&detection, 24);
        for clique in 0..6 {
            let c = detection.partition[clique * 4];
            for member in 1..4 {
                assert_eq!(detection.partition[clique * 4 + member], c);
            }
        }
        assert!(detection.modularity.unwrap() >= detection.first_pass_modularity.unwrap());
        assert!(detection.modularity.unwrap() > 0.5);
    }

    #[test]
    fn test_final_modularity_not_below_first_pass() {
        let g = WeightedGraph::from_edges(
            8,
            &[
                (0, 1, 0.9),
                (1, 2, 0.4),
                (2, 3, 1.0),
                (3, 0, 0.2),
                (4, 5, 0.7),
                (5, 6, 0.3),
                (6, 7, 0.8),
                (7, 4, 0.6),
                (1, 5, 0.1),
                (2, 6, 0.05),
            ],
        );
        let detection = LouvainDetector::default().detect(&g);
        assert_cover(&detection, 8);
        assert!(detection.modularity.unwrap() >= detection.first_pass_modularity.unwrap());
        let recomputed = modularity(&g, &detection.partition);
        assert!((recomputed - detection.modularity.unwrap()).abs() < 1e-12);
    }

    #[test]
    fn test_deterministic() {
        let g = two_triangles();
        let detector = LouvainDetector::default();
        assert_eq!(detector.detect(&g), detector.detect(&g));
    }

    #[test]
    fn test_single_node_is_trivial() {
        let g = WeightedGraph::from_edges(1, &[]);
        let detection = LouvainDetector::default().detect(&g);
        assert!(detection.is_trivial());
        assert_eq!(detection.partition, vec![0]);
        assert_eq!(detection.community_count, 1);
    }

    #[test]
    fn test_no_edges_is_trivial() {
        let g = WeightedGraph::from_edges(3, &[]);
        let detection = LouvainDetector::default().detect(&g);
        assert!(detection.is_trivial());
        assert_eq!(detection.partition, vec![0, 0, 0]);
        assert_eq!(detection.modularity, None);
    }

    #[test]
    fn test_renumber_by_first_occurrence() {
        let (labels, count) = renumber(&[7, 3, 7, 9, 3]);
        assert_eq!(labels, vec![0, 1, 0, 2, 1]);
        assert_eq!(count, 3);
    }

    #[test]
    fn test_aggregate_keeps_total_weight() {
        let g = two_triangles();
        let agg = aggregate(&g, &[0, 0, 0, 1, 1, 1], 2);
        assert_eq!(agg.node_count, 2);
        assert_eq!(agg.self_loops, vec![3.0, 3.0]);
        assert_eq!(agg.edges().collect::<Vec<_>>(), vec![(0, 1, 1.0)]);
        assert!((agg.total_weight() - g.total_weight()).abs() < 1e-12);
    }
}
