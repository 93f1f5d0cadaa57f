use crate::graph::{PertGraph, Vertex};
use std::collections::HashMap;

/// Earliest-date computation: single-source longest paths from `Start`.
pub struct ForwardPass<'a> {
    graph: &'a PertGraph,
}

impl<'a> ForwardPass<'a> {
    pub fn new(graph: &'a PertGraph) -> Self {
        Self { graph }
    }

    /// Earliest date of every vertex reachable from `Start`. The date of
    /// `End` is the total project duration.
    pub fn execute(&self) -> HashMap<Vertex, i64> {
        longest_paths_from(self.graph, Vertex::Start)
    }
}

/// Bellman-Ford-style longest-path relaxation from a single source.
///
/// Scans every edge up to `V` times, stopping early once a full scan changes
/// nothing. Converges because the graph is acyclic by construction. Vertices
/// never reached from the source are absent from the result rather than
/// carrying a sentinel.
pub(crate) fn longest_paths_from(graph: &PertGraph, source: Vertex) -> HashMap<Vertex, i64> {
    let mut dates: HashMap<Vertex, i64> = HashMap::new();
    dates.insert(source, 0);

    let bound = graph.vertex_count();
    let mut rounds = 0;
    let mut changed = true;
    while rounds < bound && changed {
        changed = false;
        for (from, to, weight) in graph.edges() {
            let Some(&from_date) = dates.get(&from) else {
                continue;
            };
            let candidate = from_date + weight;
            if dates.get(&to).is_none_or(|&current| current < candidate) {
                dates.insert(to, candidate);
                changed = true;
            }
        }
        rounds += 1;
    }

    dates
}
