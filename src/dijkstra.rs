use crate::graph::{EdgeId, Graph, VertexId};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug, Clone, Copy)]
pub struct Label {
    pub best_weight: f64,
    pub prev_edge: Option<EdgeId>,
}

pub struct BuiltRoute {
    pub weight: f64,
    // Edges in traversal order, from `from` to `to`.
    pub edges: Vec<EdgeId>,
}

// Total-ordered f64 wrapper for the priority queue. Weights come from distances and
// velocity/wait-time conversions, never from user input directly, so never NaN here.
#[derive(Debug, Clone, Copy, PartialEq)]
struct OrderedCost(f64);

impl Eq for OrderedCost {}

impl PartialOrd for OrderedCost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedCost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.partial_cmp(&other.0).unwrap_or(Ordering::Equal)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HeapItem {
    cost: OrderedCost,
    // Monotonically increasing at push time; among equal costs, the earlier-pushed
    // entry (the earlier-relaxed edge) wins. Reversed together with cost so that
    // BinaryHeap, a max-heap, yields the smallest (cost, seq) pair first.
    seq: u64,
    vertex: VertexId,
}

impl PartialOrd for HeapItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapItem {
    fn cmp(&self, other: &Self) -> Ordering {
        (other.cost, other.seq).cmp(&(self.cost, self.seq))
    }
}

// update must be called (again, if the graph changes) before build_route answers
// correctly.
#[derive(Debug, Default)]
pub struct Dijkstra {
    // labels[source][vertex]; None where vertex is unreachable from source.
    labels: Vec<Vec<Option<Label>>>,
}

impl Dijkstra {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, graph: &Graph) {
        let n = graph.vertex_count();
        self.labels = (0..n).map(|source| Self::single_source(graph, source, n)).collect();
    }

    fn single_source(graph: &Graph, source: VertexId, n: usize) -> Vec<Option<Label>> {
        let mut labels: Vec<Option<Label>> = vec![None; n];
        let mut heap = BinaryHeap::new();
        let mut seq = 0u64;

        labels[source] = Some(Label { best_weight: 0.0, prev_edge: None });
        heap.push(HeapItem { cost: OrderedCost(0.0), seq, vertex: source });
        seq += 1;

        while let Some(HeapItem { cost, vertex, .. }) = heap.pop() {
            let current_best = labels[vertex].map(|l| l.best_weight).unwrap_or(f64::INFINITY);
            if cost.0 > current_best {
                continue;
            }
            for edge_id in graph.incident_edges(vertex) {
                let edge = graph.get_edge(edge_id);
                let candidate = cost.0 + edge.weight;
                let improves = match labels[edge.to] {
                    Some(existing) => candidate < existing.best_weight,
                    None => true,
                };
                if improves {
                    labels[edge.to] = Some(Label { best_weight: candidate, prev_edge: Some(edge_id) });
                    heap.push(HeapItem { cost: OrderedCost(candidate), seq, vertex: edge.to });
                    seq += 1;
                }
            }
        }

        labels
    }

    // Walks prev_edge pointers backward from to, then reverses. None if unreachable.
    pub fn build_route(&self, graph: &Graph, from: VertexId, to: VertexId) -> Option<BuiltRoute> {
        let label = self.labels[from][to]?;
        let mut edges = Vec::new();
        let mut current = to;
        while current != from {
            let current_label = self.labels[from][current].expect("reachable vertex must carry a label");
            let edge_id = current_label.prev_edge.expect("non-source reachable vertex must have a predecessor edge");
            edges.push(edge_id);
            current = graph.get_edge(edge_id).from;
        }
        edges.reverse();
        Some(BuiltRoute { weight: label.best_weight, edges })
    }
}
