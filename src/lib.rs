pub mod calculations;
pub mod graph;
pub mod metadata;
pub mod persistence;
pub mod project;
pub mod task;
pub(crate) mod task_validation;

pub use calculations::backward_pass::BackwardPass;
pub use calculations::forward_pass::ForwardPass;
pub use calculations::simulation::{SimulationError, WorkerSimulation};
pub use graph::{GraphError, PertGraph, Vertex};
pub use metadata::ProjectMetadata;
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteProjectStore;
pub use persistence::{
    PersistenceError, ProjectStore, load_project_from_csv, load_project_from_json,
    save_project_to_csv, save_project_to_json, validate_project, validate_tasks,
};
pub use project::{ComputeSummary, Project};
pub use task::Task;
