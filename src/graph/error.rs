use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    #[error("Both entities must exist before adding relationship {source_id} -> {target_id}")]
    MissingEndpoint { source_id: String, target_id: String },

    #[error("Unknown centrality measure: {0}")]
    UnsupportedMeasure(String),

    #[error("PageRank did not converge after {0} iterations")]
    NoConvergence(usize),

    #[error("Failed to load graph data from snapshot: {0}")]
    CorruptSnapshot(String),

    #[error("Snapshot store error: {0}")]
    SnapshotStore(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, GraphError>;
