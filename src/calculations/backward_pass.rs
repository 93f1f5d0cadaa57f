use crate::calculations::forward_pass::longest_paths_from;
use crate::graph::{PertGraph, Vertex};
use std::collections::HashMap;

/// Latest-date computation via the reversed graph.
///
/// The latest date of a vertex is the total duration minus the longest path
/// from that vertex to `End`, which equals the longest path from `End` to the
/// vertex once every edge is flipped. The reversed graph is derived fresh and
/// discarded here; the original is never touched.
pub struct BackwardPass<'a> {
    graph: &'a PertGraph,
}

impl<'a> BackwardPass<'a> {
    pub fn new(graph: &'a PertGraph) -> Self {
        Self { graph }
    }

    pub fn execute(&self) -> HashMap<Vertex, i64> {
        let reversed = self.graph.reversed();
        let reversed_dates = longest_paths_from(&reversed, Vertex::End);

        // Start is a sink in the reversed graph, so its reversed date is the
        // total project duration.
        let total = reversed_dates.get(&Vertex::Start).copied().unwrap_or(0);

        reversed_dates
            .into_iter()
            .map(|(vertex, date)| (vertex, total - date))
            .collect()
    }
}
