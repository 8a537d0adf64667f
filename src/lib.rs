pub mod builder;
pub mod config;
pub mod extractor;
pub mod graph;
pub mod passage;
pub mod retrieval;

pub use builder::{EntityConnections, GraphBuilder, GraphSummary};
pub use config::Config;
pub use extractor::{merge_entities, merge_relationships, EntityExtractor};
pub use graph::{
    error::GraphError, Entity, EntityType, GraphPersistence, KnowledgeGraph, RelationType,
    Relationship,
};
pub use passage::Passage;
pub use retrieval::{expand_search_hits, GraphExpansion, SearchHit};
