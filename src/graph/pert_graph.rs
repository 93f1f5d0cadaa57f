use crate::task::Task;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Vertex of the activity graph: the N real tasks plus the two synthetic
/// boundary vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vertex {
    Start,
    End,
    Task(i32),
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Vertex::Start => write!(f, "start"),
            Vertex::End => write!(f, "end"),
            Vertex::Task(id) => write!(f, "task {id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    UnknownVertex(Vertex),
    EdgeNotFound { from: Vertex, to: Vertex },
    CyclicDependency,
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::UnknownVertex(vertex) => write!(f, "unknown vertex {vertex}"),
            GraphError::EdgeNotFound { from, to } => {
                write!(f, "no edge from {from} to {to}")
            }
            GraphError::CyclicDependency => write!(f, "task dependencies form a cycle"),
        }
    }
}

impl std::error::Error for GraphError {}

/// Directed, weighted activity-on-edge graph over `N + 2` vertices.
///
/// An edge `p -> s` carries the duration of `p`, the task consumed to reach
/// `s`; `start -> t` edges weigh 0 and `t -> end` edges weigh `t`'s own
/// duration. The graph is never mutated after construction.
#[derive(Debug)]
pub struct PertGraph {
    graph: DiGraph<Vertex, i64>,
    vertex_index: HashMap<Vertex, NodeIndex>,
}

impl PertGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            vertex_index: HashMap::new(),
        }
    }

    /// Build the activity graph from a task list.
    ///
    /// Every task with no predecessors hangs off `Start` with weight 0; every
    /// task that is nobody's predecessor feeds `End` weighted by its own
    /// duration, so each real task has at least one incoming and one outgoing
    /// edge. Fails with `UnknownVertex` when a predecessor id is absent from
    /// the set and `CyclicDependency` when the dependency relation cycles.
    pub fn from_tasks(tasks: &[Task]) -> Result<Self, GraphError> {
        let mut graph = Self::new();
        graph.add_vertex(Vertex::Start);
        graph.add_vertex(Vertex::End);
        for task in tasks {
            graph.add_vertex(Vertex::Task(task.id));
        }

        let durations: HashMap<i32, i64> = tasks.iter().map(|t| (t.id, t.duration)).collect();
        let mut referenced: HashSet<i32> = HashSet::new();

        for task in tasks {
            if task.predecessors.is_empty() {
                graph.add_edge(Vertex::Start, Vertex::Task(task.id), 0)?;
                continue;
            }
            for &pred in &task.predecessors {
                let weight = durations
                    .get(&pred)
                    .copied()
                    .ok_or(GraphError::UnknownVertex(Vertex::Task(pred)))?;
                graph.add_edge(Vertex::Task(pred), Vertex::Task(task.id), weight)?;
                referenced.insert(pred);
            }
        }

        for task in tasks {
            if !referenced.contains(&task.id) {
                graph.add_edge(Vertex::Task(task.id), Vertex::End, task.duration)?;
            }
        }

        if toposort(&graph.graph, None).is_err() {
            return Err(GraphError::CyclicDependency);
        }

        Ok(graph)
    }

    pub fn add_vertex(&mut self, vertex: Vertex) {
        self.intern(vertex);
    }

    fn intern(&mut self, vertex: Vertex) -> NodeIndex {
        if let Some(&ix) = self.vertex_index.get(&vertex) {
            ix
        } else {
            let ix = self.graph.add_node(vertex);
            self.vertex_index.insert(vertex, ix);
            ix
        }
    }

    pub fn add_edge(&mut self, from: Vertex, to: Vertex, weight: i64) -> Result<(), GraphError> {
        let from_ix = self.index_of(from)?;
        let to_ix = self.index_of(to)?;
        self.graph.add_edge(from_ix, to_ix, weight);
        Ok(())
    }

    pub fn edge_weight(&self, from: Vertex, to: Vertex) -> Result<i64, GraphError> {
        let from_ix = self.index_of(from)?;
        let to_ix = self.index_of(to)?;
        let edge = self
            .graph
            .find_edge(from_ix, to_ix)
            .ok_or(GraphError::EdgeNotFound { from, to })?;
        Ok(self.graph[edge])
    }

    pub fn has_vertex(&self, vertex: Vertex) -> bool {
        self.vertex_index.contains_key(&vertex)
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All edges as `(from, to, weight)` triples.
    pub fn edges(&self) -> impl Iterator<Item = (Vertex, Vertex, i64)> + '_ {
        self.graph.edge_references().map(|edge| {
            (
                self.graph[edge.source()],
                self.graph[edge.target()],
                *edge.weight(),
            )
        })
    }

    /// A fresh graph with every edge flipped and its weight preserved. The
    /// original is left untouched.
    pub fn reversed(&self) -> Self {
        let mut flipped = Self::new();
        for &vertex in self.graph.node_weights() {
            flipped.add_vertex(vertex);
        }
        for (from, to, weight) in self.edges() {
            let from_ix = flipped.intern(to);
            let to_ix = flipped.intern(from);
            flipped.graph.add_edge(from_ix, to_ix, weight);
        }
        flipped
    }

    fn index_of(&self, vertex: Vertex) -> Result<NodeIndex, GraphError> {
        self.vertex_index
            .get(&vertex)
            .copied()
            .ok_or(GraphError::UnknownVertex(vertex))
    }
}

impl Default for PertGraph {
    fn default() -> Self {
        Self::new()
    }
}
