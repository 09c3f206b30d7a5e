//! Input-association graph and Reverse Cuthill-McKee ordering
//!
//! The association graph has one vertex per primary input; an edge joins
//! two inputs whenever some AND gate's support set contains both of
//! them. RCM is the only ordering algorithm that consumes this graph
//! directly instead of the feature table.

use std::collections::{BTreeSet, VecDeque};

use crate::index::CircuitIndex;
use crate::literal::Lit;
use crate::record::AagRecord;
use crate::support::SupportAnalyzer;

/// Undirected input-association graph over `[0, n)` vertices, stored as
/// adjacency sets (self-loops excluded, parallel edges collapsed).
#[derive(Debug, Clone)]
pub struct AssociationGraph {
    adjacency: Vec<BTreeSet<usize>>,
}

impl AssociationGraph {
    /// Build the graph by taking the support set of every AND gate's
    /// output and connecting every pair of inputs within it.
    pub fn build(record: &AagRecord, index: &CircuitIndex, support: &mut SupportAnalyzer) -> Self {
        let n = record.num_inputs();
        let mut adjacency = vec![BTreeSet::new(); n];

        for raw in &record.and_gates {
            let fields: Vec<&str> = raw.split_whitespace().collect();
            if fields.len() != 3 {
                continue;
            }
            let Some(out) = Lit::parse(fields[0]) else {
                continue;
            };
            let members: Vec<usize> = support.support(out).into_iter().collect();
            for i in 0..members.len() {
                for j in (i + 1)..members.len() {
                    let (u, v) = (members[i], members[j]);
                    if u != v {
                        adjacency[u].insert(v);
                        adjacency[v].insert(u);
                    }
                }
            }
        }

        AssociationGraph { adjacency }
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.adjacency.len()
    }

    /// Degree of vertex `v`.
    pub fn degree(&self, v: usize) -> usize {
        self.adjacency[v].len()
    }

    /// Neighbours of vertex `v`, in ascending order.
    pub fn neighbors(&self, v: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency[v].iter().copied()
    }

    /// Bandwidth of the graph under permutation `pos`, where `pos[v]` is
    /// the position of vertex `v`: the maximum, over every edge `(u, v)`,
    /// of `|pos[u] - pos[v]|`.
    pub fn bandwidth(&self, pos: &[usize]) -> usize {
        let mut max = 0;
        for (u, neighbors) in self.adjacency.iter().enumerate() {
            for &v in neighbors {
                let d = pos[u].abs_diff(pos[v]);
                if d > max {
                    max = d;
                }
            }
        }
        max
    }
}

/// Reverse Cuthill-McKee ordering of the association graph.
///
/// Connected components are processed in ascending order of any
/// unvisited vertex of minimum degree. Within a component, BFS runs from
/// that seed, and at each dequeue the unvisited neighbours are sorted by
/// ascending static degree (not updated as the traversal proceeds).
/// Each component's BFS visit order is emitted reversed; components are
/// concatenated in processing order.
pub fn rcm_order(graph: &AssociationGraph) -> Vec<usize> {
    let n = graph.num_vertices();
    if n == 0 {
        return Vec::new();
    }

    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);

    let mut seeds: Vec<usize> = (0..n).collect();
    seeds.sort_by_key(|&v| (graph.degree(v), v));

    for seed in seeds {
        if visited[seed] {
            continue;
        }
        let mut component_order = vec![seed];
        visited[seed] = true;
        let mut queue = VecDeque::from([seed]);
        while let Some(u) = queue.pop_front() {
            let mut neighbors: Vec<usize> = graph
                .neighbors(u)
                .filter(|&v| !visited[v])
                .collect();
            neighbors.sort_by_key(|&v| graph.degree(v));
            for v in neighbors {
                visited[v] = true;
                queue.push_back(v);
                component_order.push(v);
            }
        }
        order.extend(component_order.into_iter().rev());
    }

    if order.len() != n {
        return (0..n).collect();
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::parse_aag;

    fn graph_for(text: &str) -> AssociationGraph {
        let rec = parse_aag(text).unwrap();
        let idx = CircuitIndex::build(&rec);
        let mut sup = SupportAnalyzer::new(&idx);
        AssociationGraph::build(&rec, &idx, &mut sup)
    }

    #[test]
    fn test_path_graph_rcm() {
        // Three independent two-input AND gates, each combining a
        // direct-literal pair, give a support-induced path 0-1-2-3: only
        // consecutive inputs co-occur in some gate's support.
        let text = "aag 7 4 0 1 3\n2\n4\n6\n8\n14\n10 2 4\n12 4 6\n14 6 8\n";
        let g = graph_for(text);
        assert_eq!(g.degree(0), 1);
        assert_eq!(g.degree(1), 2);
        assert_eq!(g.degree(2), 2);
        assert_eq!(g.degree(3), 1);

        let order = rcm_order(&g);
        assert_eq!(order, vec![3, 2, 1, 0]);
    }

    #[test]
    fn test_rcm_achieves_minimal_bandwidth_on_path_graph() {
        // The true bandwidth of a path graph is 1; RCM's documented bound
        // is |pos[u] - pos[v]| <= 2 * bandwidth(G) for every edge.
        let text = "aag 7 4 0 1 3\n2\n4\n6\n8\n14\n10 2 4\n12 4 6\n14 6 8\n";
        let g = graph_for(text);
        let order = rcm_order(&g);
        let mut pos = vec![0usize; order.len()];
        for (p, &v) in order.iter().enumerate() {
            pos[v] = p;
        }
        let achieved = g.bandwidth(&pos);
        assert_eq!(achieved, 1);
        for u in 0..g.num_vertices() {
            for v in g.neighbors(u) {
                assert!(pos[u].abs_diff(pos[v]) <= 2 * achieved);
            }
        }
    }

    #[test]
    fn test_empty_graph_is_empty_order() {
        let text = "aag 0 0 0 0 0\n";
        let g = graph_for(text);
        assert_eq!(rcm_order(&g), Vec::<usize>::new());
    }

    #[test]
    fn test_disconnected_components() {
        // Gate output uses a fresh literal (10) distinct from every input
        // literal, so only inputs 0 and 1 are linked; 2 and 3 stay isolated.
        let text = "aag 5 4 0 2 1\n2\n4\n6\n8\n10\n8\n10 2 4\n";
        let g = graph_for(text);
        assert_eq!(g.degree(0), 1);
        assert_eq!(g.degree(1), 1);
        assert_eq!(g.degree(2), 0);
        assert_eq!(g.degree(3), 0);

        let order = rcm_order(&g);
        assert_eq!(order, vec![2, 3, 1, 0]);
    }
}
