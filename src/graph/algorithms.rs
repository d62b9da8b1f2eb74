//! Graph algorithms for pruning and decomposition

use crate::graph::{TagGraph, WeightedGraph};

/// Union-Find data structure for connected component analysis
pub struct DisjointSets {
    /// Parent pointers (parent[i] = parent of node i)
    parent: Vec<u32>,

    /// Size of each set (for union by size)
    rank: Vec<u32>,
}

impl DisjointSets {
    /// Create a new DisjointSets data structure
    pub fn new(size: usize) -> Self {
        Self {
            parent: (0..size as u32).collect(),
            rank: vec![1; size],
        }
    }

    /// Find the root of the set containing x with path compression
    pub fn find(&mut self, x: u32) -> u32 {
        let px = self.parent[x as usize];
        if px != x {
            self.parent[x as usize] = self.find(px);
        }
        self.parent[x as usize]
    }

    /// Union the sets containing x and y
    pub fn union(&mut self, x: u32, y: u32) {
        let root_x = self.find(x);
        let root_y = self.find(y);

        if root_x == root_y {
            return;
        }

        // Attach the smaller tree under the root of the larger one
        if self.rank[root_x as usize] > self.rank[root_y as usize] {
            self.parent[root_y as usize] = root_x;
            self.rank[root_x as usize] += self.rank[root_y as usize];
        } else {
            self.parent[root_x as usize] = root_y;
            self.rank[root_y as usize] += self.rank[root_x as usize];
        }
    }
}

/// Connected components, each sorted ascending, ordered by smallest member
pub fn connected_components(graph: &WeightedGraph) -> Vec<Vec<usize>> {
    let mut sets = DisjointSets::new(graph.node_count);
    for (i, j, _) in graph.edges() {
        sets.union(i as u32, j as u32);
    }

    let mut root_to_component: Vec<Option<usize>> = vec![None; graph.node_count];
    let mut components: Vec<Vec<usize>> = Vec::new();
    for node in 0..graph.node_count {
        let root = sets.find(node as u32) as usize;
        let idx = *root_to_component[root].get_or_insert_with(|| {
            components.push(Vec::new());
            components.len() - 1
        });
        components[idx].push(node);
    }

    components
}

/// Induced subgraph on the nodes whose degree is at least `min_degree`.
///
/// Degrees are measured on the input graph, and node attributes and edge
/// weights carry over unchanged.
pub fn filter_by_degree(graph: &TagGraph, min_degree: usize) -> TagGraph {
    let pass_filter: Vec<bool> = (0..graph.node_count())
        .map(|node| graph.degree(node) >= min_degree)
        .collect();

    let mut filtered = TagGraph::new();
    for (idx, node) in graph.nodes().enumerate() {
        if pass_filter[idx] {
            let new_idx = filtered.get_or_create_node(&node.tag);
            filtered.node_mut(new_idx.index()).clone_from(node);
        }
    }

    for (i, j, w) in graph.edges() {
        // Only include edges where both endpoints pass the filter
        if pass_filter[i] && pass_filter[j] {
            filtered.add_edge(&graph.node(i).tag, &graph.node(j).tag, w);
        }
    }

    log::info!(
        "Degree filter kept {} of {} nodes",
        filtered.node_count(),
        graph.node_count()
    );

    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disjoint_sets() {
        let mut sets = DisjointSets::new(4);
        sets.union(0, 1);
        sets.union(2, 3);
        assert_eq!(sets.find(0), sets.find(1));
        assert_ne!(sets.find(1), sets.find(2));
        sets.union(1, 3);
        assert_eq!(sets.find(0), sets.find(2));
    }

    #[test]
    fn test_connected_components() {
        let g = WeightedGraph::from_edges(5, &[(0, 2, 1.0), (3, 4, 1.0)]);
        let components = connected_components(&g);
        assert_eq!(components, vec![vec![0, 2], vec![1], vec![3, 4]]);
    }

    #[test]
    fn test_filter_by_degree_keeps_attributes() {
        let mut g = TagGraph::new();
        g.add_edge("hub", "a", 1.0);
        g.add_edge("hub", "b", 0.5);
        g.add_edge("a", "b", 0.25);
        g.add_edge("hub", "leaf", 0.5);
        let popularity = [("hub".to_string(), 9)].into_iter().collect();
        g.set_popularity(&popularity);

        let filtered = filter_by_degree(&g, 2);
        assert_eq!(filtered.node_count(), 3);
        assert_eq!(filtered.edge_count(), 3);
        assert!(filtered.index_of("leaf").is_none());
        assert_eq!(filtered.node_by_tag("hub").unwrap().popularity, 9);
        assert_eq!(filtered.weight("a", "b"), Some(0.25));
    }
}
