pub mod centrality;
pub mod edge;
pub mod error;
pub mod knowledge_graph;
pub mod node;
pub mod snapshot;
pub mod store;

pub use centrality::CentralityMeasure;
pub use edge::{RelationType, Relationship};
pub use error::GraphError;
pub use knowledge_graph::{GraphStatistics, KnowledgeGraph};
pub use node::{generate_entity_id, Entity, EntityType};
pub use snapshot::GraphSnapshot;
pub use store::{FileSnapshotStore, GraphPersistence, SnapshotStore};
