//! Centrality measures over the directed multigraph.
//!
//! Every function returns one score per node, indexed by `NodeIndex::index()`.
//! Degree and pagerank count parallel edges; betweenness and closeness walk
//! shortest paths, where parallel edges collapse into a single hop.

use petgraph::{
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
    Direction,
};
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use crate::graph::error::{GraphError, Result};

const PAGERANK_ALPHA: f64 = 0.85;
const PAGERANK_MAX_ITER: usize = 100;
const PAGERANK_TOLERANCE: f64 = 1.0e-6;

/// Supported centrality measures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CentralityMeasure {
    Degree,
    Betweenness,
    Closeness,
    PageRank,
}

impl FromStr for CentralityMeasure {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "degree" => Ok(CentralityMeasure::Degree),
            "betweenness" => Ok(CentralityMeasure::Betweenness),
            "closeness" => Ok(CentralityMeasure::Closeness),
            "pagerank" => Ok(CentralityMeasure::PageRank),
            other => Err(GraphError::UnsupportedMeasure(other.to_string())),
        }
    }
}

impl fmt::Display for CentralityMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CentralityMeasure::Degree => "degree",
            CentralityMeasure::Betweenness => "betweenness",
            CentralityMeasure::Closeness => "closeness",
            CentralityMeasure::PageRank => "pagerank",
        })
    }
}

/// Compute the given measure for every node
pub fn compute<N, E>(graph: &DiGraph<N, E>, measure: CentralityMeasure) -> Result<Vec<f64>> {
    match measure {
        CentralityMeasure::Degree => Ok(degree(graph)),
        CentralityMeasure::Betweenness => Ok(betweenness(graph)),
        CentralityMeasure::Closeness => Ok(closeness(graph)),
        CentralityMeasure::PageRank => pagerank(graph),
    }
}

/// Distinct neighbours in one direction, self-loops dropped
fn adjacency<N, E>(graph: &DiGraph<N, E>, direction: Direction) -> Vec<Vec<usize>> {
    graph
        .node_indices()
        .map(|idx| {
            let mut neighbors: Vec<usize> = graph
                .neighbors_directed(idx, direction)
                .map(NodeIndex::index)
                .filter(|&n| n != idx.index())
                .collect();
            neighbors.sort_unstable();
            neighbors.dedup();
            neighbors
        })
        .collect()
}

/// In-degree plus out-degree, normalized by `n - 1`
pub fn degree<N, E>(graph: &DiGraph<N, E>) -> Vec<f64> {
    let n = graph.node_count();
    if n <= 1 {
        return vec![1.0; n];
    }
    let scale = 1.0 / (n - 1) as f64;
    graph
        .node_indices()
        .map(|idx| {
            let deg = graph.edges_directed(idx, Direction::Outgoing).count()
                + graph.edges_directed(idx, Direction::Incoming).count();
            deg as f64 * scale
        })
        .collect()
}

/// Brandes' algorithm on directed, unweighted edges
pub fn betweenness<N, E>(graph: &DiGraph<N, E>) -> Vec<f64> {
    let n = graph.node_count();
    let successors = adjacency(graph, Direction::Outgoing);
    let mut scores = vec![0.0; n];

    for source in 0..n {
        let mut stack = Vec::with_capacity(n);
        let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut sigma = vec![0.0_f64; n];
        let mut dist: Vec<Option<usize>> = vec![None; n];
        sigma[source] = 1.0;
        dist[source] = Some(0);

        let mut queue = VecDeque::from([source]);
        while let Some(v) = queue.pop_front() {
            stack.push(v);
            let dv = dist[v].unwrap_or_default();
            for &w in &successors[v] {
                if dist[w].is_none() {
                    dist[w] = Some(dv + 1);
                    queue.push_back(w);
                }
                if dist[w] == Some(dv + 1) {
                    sigma[w] += sigma[v];
                    preds[w].push(v);
                }
            }
        }

        let mut delta = vec![0.0_f64; n];
        while let Some(w) = stack.pop() {
            for &v in &preds[w] {
                delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
            }
            if w != source {
                scores[w] += delta[w];
            }
        }
    }

    if n > 2 {
        let scale = 1.0 / ((n - 1) * (n - 2)) as f64;
        scores.iter_mut().for_each(|s| *s *= scale);
    }
    scores
}

/// Closeness over incoming distances, scaled by the reachable fraction
pub fn closeness<N, E>(graph: &DiGraph<N, E>) -> Vec<f64> {
    let n = graph.node_count();
    let predecessors = adjacency(graph, Direction::Incoming);

    (0..n)
        .map(|target| {
            let mut dist: Vec<Option<usize>> = vec![None; n];
            dist[target] = Some(0);
            let mut queue = VecDeque::from([target]);
            let mut total = 0usize;
            let mut reachable = 1usize;

            while let Some(v) = queue.pop_front() {
                let dv = dist[v].unwrap_or_default();
                for &w in &predecessors[v] {
                    if dist[w].is_none() {
                        dist[w] = Some(dv + 1);
                        total += dv + 1;
                        reachable += 1;
                        queue.push_back(w);
                    }
                }
            }

            if total > 0 && n > 1 {
                let r = (reachable - 1) as f64;
                (r / total as f64) * (r / (n - 1) as f64)
            } else {
                0.0
            }
        })
        .collect()
}

/// Power-iteration pagerank with uniform teleport and dangling redistribution
pub fn pagerank<N, E>(graph: &DiGraph<N, E>) -> Result<Vec<f64>> {
    let n = graph.node_count();
    if n == 0 {
        return Ok(Vec::new());
    }
    let uniform = 1.0 / n as f64;
    let out_degree: Vec<usize> = graph
        .node_indices()
        .map(|idx| graph.edges_directed(idx, Direction::Outgoing).count())
        .collect();

    let mut rank = vec![uniform; n];
    for _ in 0..PAGERANK_MAX_ITER {
        let last = rank;
        rank = vec![0.0; n];

        let dangling: f64 = PAGERANK_ALPHA
            * (0..n)
                .filter(|&i| out_degree[i] == 0)
                .map(|i| last[i])
                .sum::<f64>();

        for edge in graph.edge_references() {
            let src = edge.source().index();
            let dst = edge.target().index();
            rank[dst] += PAGERANK_ALPHA * last[src] / out_degree[src] as f64;
        }
        for value in rank.iter_mut() {
            *value += dangling * uniform + (1.0 - PAGERANK_ALPHA) * uniform;
        }

        let err: f64 = rank.iter().zip(&last).map(|(a, b)| (a - b).abs()).sum();
        if err < n as f64 * PAGERANK_TOLERANCE {
            return Ok(rank);
        }
    }

    Err(GraphError::NoConvergence(PAGERANK_MAX_ITER))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-4
    }

    /// a -> b -> c
    fn chain() -> DiGraph<(), ()> {
        let mut graph = DiGraph::new();
        let a = graph.add_node(());
        let b = graph.add_node(());
        let c = graph.add_node(());
        graph.add_edge(a, b, ());
        graph.add_edge(b, c, ());
        graph
    }

    #[test]
    fn test_measure_parsing() {
        assert_eq!("pagerank".parse::<CentralityMeasure>().unwrap(), CentralityMeasure::PageRank);
        assert!(matches!(
            "eigenvector".parse::<CentralityMeasure>(),
            Err(GraphError::UnsupportedMeasure(m)) if m == "eigenvector"
        ));
    }

    #[test]
    fn test_degree_counts_parallel_edges() {
        let mut graph = chain();
        graph.add_edge(NodeIndex::new(0), NodeIndex::new(1), ());

        let scores = degree(&graph);
        assert!(approx(scores[0], 1.0));
        assert!(approx(scores[1], 1.5));
        assert!(approx(scores[2], 0.5));
    }

    #[test]
    fn test_degree_single_node() {
        let mut graph: DiGraph<(), ()> = DiGraph::new();
        graph.add_node(());
        assert_eq!(degree(&graph), vec![1.0]);
    }

    #[test]
    fn test_betweenness_chain() {
        let scores = betweenness(&chain());
        assert!(approx(scores[0], 0.0));
        assert!(approx(scores[1], 0.5));
        assert!(approx(scores[2], 0.0));
    }

    #[test]
    fn test_closeness_chain() {
        let scores = closeness(&chain());
        assert!(approx(scores[0], 0.0));
        // only a reaches b, at distance 1
        assert!(approx(scores[1], 0.5));
        // a and b reach c, distances 2 and 1
        assert!(approx(scores[2], (2.0 / 3.0) * 1.0));
    }

    #[test]
    fn test_pagerank_sums_to_one() {
        let scores = pagerank(&chain()).unwrap();
        let total: f64 = scores.iter().sum();

        assert!(approx(total, 1.0));
        assert!(scores[2] > scores[1]);
        assert!(scores[1] > scores[0]);
    }

    #[test]
    fn test_pagerank_symmetric_cycle() {
        let mut graph: DiGraph<(), ()> = DiGraph::new();
        let a = graph.add_node(());
        let b = graph.add_node(());
        graph.add_edge(a, b, ());
        graph.add_edge(b, a, ());

        let scores = pagerank(&graph).unwrap();
        assert!(approx(scores[0], 0.5));
        assert!(approx(scores[1], 0.5));
    }

    #[test]
    fn test_empty_graph() {
        let graph: DiGraph<(), ()> = DiGraph::new();
        for measure in [
            CentralityMeasure::Degree,
            CentralityMeasure::Betweenness,
            CentralityMeasure::Closeness,
            CentralityMeasure::PageRank,
        ] {
            assert!(compute(&graph, measure).unwrap().is_empty());
        }
    }
}
