use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::extractor::{merge_entities, merge_relationships, EntityExtractor};
use crate::graph::{
    CentralityMeasure, Entity, EntityType, GraphError, GraphStatistics, KnowledgeGraph,
    Relationship,
};
use crate::passage::Passage;

const PROGRESS_INTERVAL: usize = 50;
const TOP_CENTRAL_ENTITIES: usize = 10;

/// Overview of a constructed graph
#[derive(Debug, Clone, Serialize)]
pub struct GraphSummary {
    pub basic_stats: GraphStatistics,
    pub entity_type_distribution: BTreeMap<EntityType, usize>,
    /// Highest-pagerank entities rendered as `"name (type, score)"`
    pub top_central_entities: Vec<String>,
}

/// One-hop neighbourhood of an entity, grouped by type
#[derive(Debug, Clone, Serialize)]
pub struct EntityConnections {
    pub entity: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub appears_in_chunks: usize,
    pub connections: BTreeMap<EntityType, Vec<String>>,
}

/// Builds and queries a knowledge graph from course passages
pub struct GraphBuilder {
    extractor: EntityExtractor,
    graph_store: KnowledgeGraph,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::with_graph_store(KnowledgeGraph::new())
    }

    pub fn with_graph_store(graph_store: KnowledgeGraph) -> Self {
        Self {
            extractor: EntityExtractor::new(),
            graph_store,
        }
    }

    /// Extract and merge entities and relationships across a batch of passages
    fn extract_batch(&self, passages: &[Passage]) -> (BTreeMap<String, Entity>, Vec<Relationship>) {
        let mut all_entities = Vec::with_capacity(passages.len());
        let mut all_relationships = Vec::with_capacity(passages.len());

        for (i, passage) in passages.iter().enumerate() {
            if i % PROGRESS_INTERVAL == 0 {
                tracing::debug!("Processing chunk {}/{}", i + 1, passages.len());
            }
            let entities = self.extractor.extract(passage);
            all_relationships.push(self.extractor.infer_relationships(&entities, passage));
            all_entities.push(entities);
        }

        let entities = merge_entities(all_entities);
        let relationships = merge_relationships(all_relationships);
        tracing::debug!(
            entities = entities.len(),
            relationships = relationships.len(),
            "Merged entities and relationships"
        );
        (entities, relationships)
    }

    /// Insert relationships into `graph`, skipping any whose endpoints are missing.
    ///
    /// Returns the number of skipped relationships.
    fn insert_relationships(graph: &mut KnowledgeGraph, relationships: Vec<Relationship>) -> usize {
        let mut skipped = 0;
        for relationship in relationships {
            if let Err(e) = graph.add_relationship(relationship) {
                tracing::debug!("Skipping relationship: {}", e);
                skipped += 1;
            }
        }
        skipped
    }

    /// Build a fresh knowledge graph from passages
    pub fn build_from_passages(&mut self, passages: &[Passage]) -> &KnowledgeGraph {
        tracing::info!("Building knowledge graph from {} chunks", passages.len());
        let (entities, relationships) = self.extract_batch(passages);

        self.graph_store = KnowledgeGraph::new();
        for entity in entities.into_values() {
            self.graph_store.add_entity(entity);
        }
        let skipped = Self::insert_relationships(&mut self.graph_store, relationships);

        tracing::info!(
            skipped,
            stats = ?self.graph_store.get_statistics(),
            "Knowledge graph construction complete"
        );
        &self.graph_store
    }

    /// Merge new passages into `existing` in place.
    ///
    /// Entities already present keep their data and gain the new passages in
    /// their provenance. The builder's own graph is left untouched.
    pub fn update_with_new_passages<'a>(
        &self,
        passages: &[Passage],
        existing: &'a mut KnowledgeGraph,
    ) -> &'a KnowledgeGraph {
        tracing::info!("Updating graph with {} new chunks", passages.len());
        let (entities, relationships) = self.extract_batch(passages);

        for entity in entities.into_values() {
            let entity = match existing.get_entity(&entity.id) {
                Some(current) => {
                    let mut updated = current.clone();
                    updated.merge_chunk_ids(&entity.chunk_ids);
                    updated
                }
                None => entity,
            };
            existing.add_entity(entity);
        }
        let skipped = Self::insert_relationships(existing, relationships);

        tracing::info!(
            skipped,
            stats = ?existing.get_statistics(),
            "Graph update complete"
        );
        existing
    }

    /// Passages sharing related entities with `chunk_id`, excluding `chunk_id` itself
    pub fn find_related_chunks(&self, chunk_id: &str, max_depth: usize) -> Vec<String> {
        let mut related_entities = BTreeSet::new();
        for entity in self.graph_store.get_entities_in_chunk(chunk_id) {
            related_entities.extend(self.graph_store.get_related_entities(&entity.id, None, max_depth));
        }

        let mut chunks = self.graph_store.get_chunks_for_entities(&related_entities);
        chunks.remove(chunk_id);
        chunks.into_iter().collect()
    }

    /// Passages containing an entity whose name equals `name`, ignoring case
    pub fn find_chunks_by_entity_name(&self, name: &str, entity_type: Option<EntityType>) -> Vec<String> {
        let name = name.to_lowercase();
        self.graph_store
            .entities()
            .filter(|e| e.name.to_lowercase() == name)
            .filter(|e| entity_type.map_or(true, |t| e.entity_type == t))
            .flat_map(|e| e.chunk_ids.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Connections of the first entity whose name contains `name`, ignoring case
    pub fn get_entity_connections(&self, name: &str) -> Result<EntityConnections, GraphError> {
        let needle = name.to_lowercase();
        let target = self
            .graph_store
            .entities()
            .find(|e| e.name.to_lowercase().contains(&needle))
            .ok_or_else(|| GraphError::EntityNotFound(name.to_string()))?;

        let mut connections: BTreeMap<EntityType, Vec<String>> = BTreeMap::new();
        for id in self.graph_store.get_related_entities(&target.id, None, 1) {
            if let Some(related) = self.graph_store.get_entity(&id) {
                connections
                    .entry(related.entity_type)
                    .or_default()
                    .push(related.name.clone());
            }
        }

        Ok(EntityConnections {
            entity: target.name.clone(),
            entity_type: target.entity_type,
            appears_in_chunks: target.chunk_ids.len(),
            connections,
        })
    }

    /// Statistics, type distribution and the most central entities
    pub fn get_graph_summary(&self) -> GraphSummary {
        let mut entity_type_distribution = BTreeMap::new();
        for entity in self.graph_store.entities() {
            *entity_type_distribution.entry(entity.entity_type).or_insert(0) += 1;
        }

        let top_central_entities =
            self.rank_central_entities(self.graph_store.centrality(CentralityMeasure::PageRank));

        GraphSummary {
            basic_stats: self.graph_store.get_statistics(),
            entity_type_distribution,
            top_central_entities,
        }
    }

    /// Render the highest-scoring entities, or nothing when scoring failed
    fn rank_central_entities(&self, scores: Result<HashMap<String, f64>, GraphError>) -> Vec<String> {
        let scores = match scores {
            Ok(scores) => scores,
            Err(e) => {
                tracing::warn!("Centrality unavailable for summary: {}", e);
                return Vec::new();
            }
        };

        let mut ranked: Vec<(&Entity, f64)> = self
            .graph_store
            .entities()
            .filter_map(|e| scores.get(&e.id).map(|score| (e, *score)))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
            .into_iter()
            .take(TOP_CENTRAL_ENTITIES)
            .map(|(e, score)| format!("{} ({}, {:.3})", e.name, e.entity_type, score))
            .collect()
    }

    pub fn clear_graph(&mut self) {
        self.graph_store.clear();
    }

    pub fn graph_store(&self) -> &KnowledgeGraph {
        &self.graph_store
    }

    pub fn set_graph_store(&mut self, graph_store: KnowledgeGraph) {
        self.graph_store = graph_store;
    }

    pub fn into_graph_store(self) -> KnowledgeGraph {
        self.graph_store
    }
}
