//! Partition quality measures

use crate::graph::WeightedGraph;

/// Newman modularity of a partition.
///
/// `Q = sum_c [ in_c / m - (tot_c / 2m)^2 ]`, where `in_c` is the weight of
/// edges inside community `c` (self-loops included), `tot_c` the summed
/// weighted degree of its members, and `m` the total edge weight. Equal to
/// `(1/2m) sum_ij [A_ij - k_i k_j / 2m] [c_i = c_j]` on graphs without
/// self-loops. Returns 0.0 for a graph without edge weight.
pub fn modularity(graph: &WeightedGraph, partition: &[usize]) -> f64 {
    let m = graph.total_weight();
    if m <= 0.0 {
        return 0.0;
    }

    let communities = partition.iter().copied().max().map_or(0, |c| c + 1);
    let mut internal = vec![0.0; communities];
    let mut total = vec![0.0; communities];

    for node in 0..graph.node_count {
        let c = partition[node];
        total[c] += graph.weighted_degree(node);
        internal[c] += graph.self_loops[node];
    }
    for (i, j, w) in graph.edges() {
        if partition[i] == partition[j] {
            internal[partition[i]] += w;
        }
    }

    internal
        .iter()
        .zip(&total)
        .map(|(&in_c, &tot_c)| in_c / m - (tot_c / (2.0 * m)).powi(2))
        .sum()
}

/// Fraction of member pairs joined by an edge
pub fn density(graph: &WeightedGraph, members: &[usize]) -> f64 {
    let n = members.len();
    if n <= 1 {
        return 1.0; // By convention, singleton communities have density 1
    }

    let potential_edges = n * (n - 1) / 2;

    let mut in_community = vec![false; graph.node_count];
    for &node in members {
        in_community[node] = true;
    }

    let mut actual_edges = 0;
    for &src in members {
        for (dst, _) in graph.neighbors(src) {
            // Count each undirected edge once
            if src < dst && in_community[dst] {
                actual_edges += 1;
            }
        }
    }

    actual_edges as f64 / potential_edges as f64
}
