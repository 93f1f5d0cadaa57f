pub mod pert_graph;

pub use pert_graph::{GraphError, PertGraph, Vertex};
