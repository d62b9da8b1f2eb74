//! Compressed weighted adjacency used by the numeric algorithms

use std::collections::BTreeMap;

/// Compressed sparse representation of an undirected weighted graph.
///
/// Every edge is stored in both directions. Self-loops are kept out of the
/// adjacency arrays and tracked per node, since only community aggregation
/// produces them.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedGraph {
    /// Number of nodes in the graph
    pub node_count: usize,

    /// Offset array: offsets[i] to offsets[i+1] is the neighbor range of node i
    pub offsets: Vec<u32>,

    /// Neighbor indices, sorted within each node's range
    pub targets: Vec<u32>,

    /// Edge weights, parallel to `targets`
    pub weights: Vec<f64>,

    /// Self-loop weight per node
    pub self_loops: Vec<f64>,
}

impl WeightedGraph {
    /// Build from an undirected edge list. Parallel edges are summed and
    /// `(i, i, w)` entries are folded into the self-loop weight of `i`.
    pub fn from_edges(node_count: usize, edges: &[(usize, usize, f64)]) -> Self {
        let mut self_loops = vec![0.0; node_count];
        let mut merged: BTreeMap<(usize, usize), f64> = BTreeMap::new();

        for &(a, b, w) in edges {
            if a == b {
                self_loops[a] += w;
                continue;
            }
            let key = if a < b { (a, b) } else { (b, a) };
            *merged.entry(key).or_insert(0.0) += w;
        }

        Self::from_merged(node_count, merged, self_loops)
    }

    /// Build from unique `i < j` edges plus explicit self-loop weights
    pub fn from_merged(
        node_count: usize,
        merged: BTreeMap<(usize, usize), f64>,
        self_loops: Vec<f64>,
    ) -> Self {
        let mut adjacency: Vec<Vec<(u32, f64)>> = vec![Vec::new(); node_count];
        for ((a, b), w) in merged {
            adjacency[a].push((b as u32, w));
            adjacency[b].push((a as u32, w));
        }

        let edge_count: usize = adjacency.iter().map(|list| list.len()).sum();
        let mut offsets = Vec::with_capacity(node_count + 1);
        let mut targets = Vec::with_capacity(edge_count);
        let mut weights = Vec::with_capacity(edge_count);

        offsets.push(0);
        let mut offset = 0u32;
        for list in &mut adjacency {
            // Sorted ranges keep neighbor visits deterministic
            list.sort_unstable_by_key(|&(target, _)| target);
            for &(target, w) in list.iter() {
                targets.push(target);
                weights.push(w);
            }
            offset += list.len() as u32;
            offsets.push(offset);
        }

        Self {
            node_count,
            offsets,
            targets,
            weights,
            self_loops,
        }
    }

    /// Neighbors of a node with edge weights
    pub fn neighbors(&self, node: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let start = self.offsets[node] as usize;
        let end = self.offsets[node + 1] as usize;
        self.targets[start..end]
            .iter()
            .zip(&self.weights[start..end])
            .map(|(&target, &w)| (target as usize, w))
    }

    /// Number of distinct neighbors
    pub fn degree(&self, node: usize) -> usize {
        (self.offsets[node + 1] - self.offsets[node]) as usize
    }

    /// Weighted degree; a self-loop counts twice
    pub fn weighted_degree(&self, node: usize) -> f64 {
        let start = self.offsets[node] as usize;
        let end = self.offsets[node + 1] as usize;
        self.weights[start..end].iter().sum::<f64>() + 2.0 * self.self_loops[node]
    }

    /// Total edge weight `m`, each undirected edge counted once
    pub fn total_weight(&self) -> f64 {
        self.weights.iter().sum::<f64>() / 2.0 + self.self_loops.iter().sum::<f64>()
    }

    /// Number of undirected edges, excluding self-loops
    pub fn edge_count(&self) -> usize {
        self.targets.len() / 2
    }

    /// Each undirected edge once, as `(i, j, w)` with `i < j`
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        (0..self.node_count).flat_map(move |i| {
            self.neighbors(i)
                .filter(move |&(j, _)| i < j)
                .map(move |(j, w)| (i, j, w))
        })
    }

    /// Induced subgraph on `members`; node `k` of the result is `members[k]`
    pub fn subgraph(&self, members: &[usize]) -> WeightedGraph {
        let mut orig_to_sub = vec![u32::MAX; self.node_count];
        for (i, &node) in members.iter().enumerate() {
            orig_to_sub[node] = i as u32;
        }

        let mut merged = BTreeMap::new();
        let mut self_loops = Vec::with_capacity(members.len());
        for (i, &node) in members.iter().enumerate() {
            self_loops.push(self.self_loops[node]);
            for (target, w) in self.neighbors(node) {
                let j = orig_to_sub[target];
                if j != u32::MAX && i < j as usize {
                    merged.insert((i, j as usize), w);
                }
            }
        }

        Self::from_merged(members.len(), merged, self_loops)
    }
}
