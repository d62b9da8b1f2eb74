//! Graph construction from co-occurrence counts

use crate::config::Config;
use crate::data::cooccurrence::PairCounts;
use crate::error::{AnalyzerError, Result};
use crate::graph::algorithms::filter_by_degree;
use crate::graph::TagGraph;

/// Turns pair counts into a pruned, weight-normalized tag graph
#[derive(Debug, Clone, PartialEq)]
pub struct GraphAssembler {
    /// Minimum raw count for an edge to survive
    edge_slicing_threshold: usize,

    /// Minimum degree for a node to survive the size filter
    node_slicing_threshold: usize,

    /// Node count above which the degree filter runs
    node_limit: Option<usize>,
}

impl GraphAssembler {
    pub fn new(
        edge_slicing_threshold: usize,
        node_slicing_threshold: usize,
        node_limit: Option<usize>,
    ) -> Self {
        Self {
            edge_slicing_threshold,
            node_slicing_threshold,
            node_limit,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.edge_slicing_threshold,
            config.node_slicing_threshold,
            config.node_limit,
        )
    }

    /// Build the pruned graph.
    ///
    /// Weights are divided by the largest count over all pairs, so the
    /// heaviest surviving edge has weight 1.0. The degree filter runs once:
    /// the result may still have more nodes than `node_limit`.
    pub fn assemble(&self, counts: &PairCounts) -> Result<TagGraph> {
        let max_weight = counts
            .max_count()
            .ok_or_else(|| AnalyzerError::EmptyGraph("no co-occurring tag pairs".to_string()))?;

        log::info!(
            "Assembling graph from {} pairs (max count {}, edge threshold {})",
            counts.len(),
            max_weight,
            self.edge_slicing_threshold
        );

        let mut graph = TagGraph::new();
        for (pair, count) in counts.sorted() {
            if (count as usize) < self.edge_slicing_threshold {
                continue;
            }
            graph.add_edge(pair.first(), pair.second(), count as f64 / max_weight as f64);
        }

        if graph.edge_count() == 0 {
            return Err(AnalyzerError::EmptyGraph(format!(
                "no pair reached the edge threshold of {}",
                self.edge_slicing_threshold
            )));
        }

        log::info!(
            "Sliced graph has {} nodes and {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        let graph = match self.node_limit {
            Some(limit) if graph.node_count() > limit => {
                log::info!(
                    "{} nodes exceed the limit of {}; keeping nodes with degree >= {}",
                    graph.node_count(),
                    limit,
                    self.node_slicing_threshold
                );
                let filtered = filter_by_degree(&graph, self.node_slicing_threshold);
                if filtered.node_count() > limit {
                    log::warn!(
                        "Graph still has {} nodes after the degree filter (limit {})",
                        filtered.node_count(),
                        limit
                    );
                }
                filtered
            }
            _ => graph,
        };

        if graph.is_empty() {
            return Err(AnalyzerError::EmptyGraph(format!(
                "no node reached the degree threshold of {}",
                self.node_slicing_threshold
            )));
        }

        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::cooccurrence::count_pairs;
    use crate::data::TagSet;

    fn tags(values: &[&str]) -> TagSet {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn python_sets() -> Vec<TagSet> {
        vec![
            tags(&["python", "django"]),
            tags(&["python", "flask"]),
            tags(&["django", "flask"]),
            tags(&["python", "django"]),
        ]
    }

    #[test]
    fn test_triangle_weights() {
        let counts = count_pairs(&python_sets());
        let graph = GraphAssembler::new(1, 0, None).assemble(&counts).unwrap();

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.weight("django", "python"), Some(1.0));
        assert_eq!(graph.weight("flask", "python"), Some(0.5));
        assert_eq!(graph.weight("django", "flask"), Some(0.5));
    }

    #[test]
    fn test_edge_threshold_drops_isolated_tags() {
        let counts = count_pairs(&python_sets());
        let graph = GraphAssembler::new(2, 0, None).assemble(&counts).unwrap();

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.index_of("flask").is_none());
        assert_eq!(graph.weight("python", "django"), Some(1.0));
    }

    #[test]
    fn test_normalized_by_global_max() {
        // The heaviest pair is the one that survives, so it stays at 1.0
        let mut sets = vec![tags(&["a", "b"]); 4];
        sets.push(tags(&["c", "d"]));
        let counts = count_pairs(&sets);
        let graph = GraphAssembler::new(2, 0, None).assemble(&counts).unwrap();

        let max = graph.edges().map(|(_, _, w)| w).fold(f64::MIN, f64::max);
        assert_eq!(max, 1.0);
    }

    #[test]
    fn test_empty_counts() {
        let result = GraphAssembler::new(1, 0, None).assemble(&PairCounts::new());
        assert!(matches!(result, Err(AnalyzerError::EmptyGraph(_))));
    }

    #[test]
    fn test_nothing_survives_threshold() {
        let counts = count_pairs(&python_sets());
        let result = GraphAssembler::new(3, 0, None).assemble(&counts);
        assert!(matches!(result, Err(AnalyzerError::EmptyGraph(_))));
    }

    #[test]
    fn test_node_limit_applies_degree_filter() {
        // Hub with four spokes plus a path a - b - c
        let sets = vec![
            tags(&["hub", "a"]),
            tags(&["hub", "b"]),
            tags(&["hub", "c"]),
            tags(&["hub", "d"]),
            tags(&["a", "b"]),
            tags(&["b", "c"]),
        ];
        let counts = count_pairs(&sets);
        let graph = GraphAssembler::new(1, 2, Some(3)).assemble(&counts).unwrap();

        // "d" has degree 1 and is dropped; "a", "b", "c", "hub" remain
        assert_eq!(graph.node_count(), 4);
        assert!(graph.index_of("d").is_none());
        // Degrees were checked before filtering, so the result exceeds the limit
        assert!(graph.node_count() > 3);
        for idx in 0..graph.node_count() {
            assert!(graph.degree(idx) >= 2);
        }
    }

    #[test]
    fn test_under_limit_skips_filter() {
        let counts = count_pairs(&python_sets());
        let graph = GraphAssembler::new(1, 10, Some(3)).assemble(&counts).unwrap();
        assert_eq!(graph.node_count(), 3);
    }

    #[test]
    fn test_degree_filter_can_empty_graph() {
        let counts = count_pairs(&python_sets());
        let result = GraphAssembler::new(1, 5, Some(1)).assemble(&counts);
        assert!(matches!(result, Err(AnalyzerError::EmptyGraph(_))));
    }
}
