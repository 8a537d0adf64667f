use petgraph::{
    algo::connected_components,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

use crate::graph::{
    centrality::{self, CentralityMeasure},
    edge::{RelationType, Relationship},
    error::{GraphError, Result},
    node::{Entity, EntityType},
    snapshot::GraphSnapshot,
};

/// Basic counts describing a knowledge graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStatistics {
    pub entity_count: usize,
    pub relationship_count: usize,
    pub chunks_with_entities_count: usize,
    pub weakly_connected_component_count: usize,
}

/// Entities and relationships extracted from passages, stored as a directed multigraph
pub struct KnowledgeGraph {
    /// The underlying graph structure; node weights are the authoritative entity table
    graph: DiGraph<Entity, Relationship>,
    /// Mapping from entity id to node index for quick lookups
    node_map: HashMap<String, NodeIndex>,
    /// Passage id to the ids of entities observed in it
    chunk_entities: BTreeMap<String, BTreeSet<String>>,
}

impl Default for KnowledgeGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl KnowledgeGraph {
    /// Create a new empty knowledge graph
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
            chunk_entities: BTreeMap::new(),
        }
    }

    /// Insert or replace an entity and index it under each of its passages.
    ///
    /// Replacing does not union provenance; callers updating an existing
    /// entity merge `chunk_ids` first.
    pub fn add_entity(&mut self, entity: Entity) -> NodeIndex {
        for chunk_id in &entity.chunk_ids {
            self.chunk_entities
                .entry(chunk_id.clone())
                .or_default()
                .insert(entity.id.clone());
        }

        match self.node_map.get(&entity.id) {
            Some(&idx) => {
                self.graph[idx] = entity;
                idx
            }
            None => {
                let id = entity.id.clone();
                let idx = self.graph.add_node(entity);
                self.node_map.insert(id, idx);
                idx
            }
        }
    }

    /// Add a directed edge carrying the relationship. Parallel edges are kept.
    pub fn add_relationship(&mut self, relationship: Relationship) -> Result<()> {
        let (Some(&from_idx), Some(&to_idx)) = (
            self.node_map.get(&relationship.source_entity_id),
            self.node_map.get(&relationship.target_entity_id),
        ) else {
            return Err(GraphError::MissingEndpoint {
                source_id: relationship.source_entity_id,
                target_id: relationship.target_entity_id,
            });
        };

        self.graph.add_edge(from_idx, to_idx, relationship);
        Ok(())
    }

    /// Get an entity by its id
    pub fn get_entity(&self, id: &str) -> Option<&Entity> {
        self.node_map.get(id).map(|idx| &self.graph[*idx])
    }

    /// Iterate over all entities in insertion order
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.graph.node_weights()
    }

    /// Iterate over all relationships, one per edge
    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.graph.edge_weights()
    }

    /// Get all entities of a specific type
    pub fn get_entities_by_type(&self, entity_type: EntityType) -> Vec<&Entity> {
        self.entities()
            .filter(|entity| entity.entity_type == entity_type)
            .collect()
    }

    /// Get all entities mentioned in a passage
    pub fn get_entities_in_chunk(&self, chunk_id: &str) -> Vec<&Entity> {
        self.chunk_entities
            .get(chunk_id)
            .map(|ids| ids.iter().filter_map(|id| self.get_entity(id)).collect())
            .unwrap_or_default()
    }

    /// Entities reachable from `entity_id` within `max_depth` hops, ignoring edge direction.
    ///
    /// With a relation filter, only edges whose type is in the filter are
    /// traversed at every hop. The start entity is never part of the result.
    pub fn get_related_entities(
        &self,
        entity_id: &str,
        relation_types: Option<&[RelationType]>,
        max_depth: usize,
    ) -> BTreeSet<String> {
        let Some(&start) = self.node_map.get(entity_id) else {
            return BTreeSet::new();
        };

        let mut related = BTreeSet::new();
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([(start, 0usize)]);

        while let Some((current, depth)) = queue.pop_front() {
            if depth >= max_depth || !visited.insert(current) {
                continue;
            }

            let neighbors: BTreeSet<NodeIndex> = self.graph.neighbors_undirected(current).collect();
            for neighbor in neighbors {
                if visited.contains(&neighbor) {
                    continue;
                }
                if let Some(types) = relation_types {
                    if !self.connected_by(current, neighbor, types) {
                        continue;
                    }
                }
                related.insert(neighbor);
                if depth + 1 < max_depth {
                    queue.push_back((neighbor, depth + 1));
                }
            }
        }

        related
            .into_iter()
            .map(|idx| self.graph[idx].id.clone())
            .collect()
    }

    /// Whether any edge between `a` and `b`, in either direction, has one of `types`
    fn connected_by(&self, a: NodeIndex, b: NodeIndex, types: &[RelationType]) -> bool {
        self.graph
            .edges_connecting(a, b)
            .chain(self.graph.edges_connecting(b, a))
            .any(|edge| types.contains(&edge.weight().relation_type))
    }

    /// Union of the passages of the given entities; unknown ids are skipped
    pub fn get_chunks_for_entities<'a>(
        &self,
        entity_ids: impl IntoIterator<Item = &'a String>,
    ) -> BTreeSet<String> {
        entity_ids
            .into_iter()
            .filter_map(|id| self.get_entity(id))
            .flat_map(|entity| entity.chunk_ids.iter().cloned())
            .collect()
    }

    /// Shortest path between two entities over the undirected projection
    pub fn find_shortest_path(&self, source_id: &str, target_id: &str) -> Option<Vec<String>> {
        let source = *self.node_map.get(source_id)?;
        let target = *self.node_map.get(target_id)?;

        let mut parent: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut seen = HashSet::from([source]);
        let mut queue = VecDeque::from([source]);

        while let Some(current) = queue.pop_front() {
            if current == target {
                let mut path = vec![current];
                let mut step = current;
                while let Some(&prev) = parent.get(&step) {
                    path.push(prev);
                    step = prev;
                }
                path.reverse();
                return Some(path.into_iter().map(|idx| self.graph[idx].id.clone()).collect());
            }
            for neighbor in self.graph.neighbors_undirected(current) {
                if seen.insert(neighbor) {
                    parent.insert(neighbor, current);
                    queue.push_back(neighbor);
                }
            }
        }

        None
    }

    /// Centrality score per entity id for the named measure
    pub fn get_entity_centrality(&self, measure: &str) -> Result<HashMap<String, f64>> {
        self.centrality(measure.parse()?)
    }

    /// Centrality score per entity id
    pub fn centrality(&self, measure: CentralityMeasure) -> Result<HashMap<String, f64>> {
        let scores = centrality::compute(&self.graph, measure)?;
        Ok(self
            .graph
            .node_indices()
            .map(|idx| (self.graph[idx].id.clone(), scores[idx.index()]))
            .collect())
    }

    /// Build the persisted document for this graph
    pub fn to_snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            entities: self
                .entities()
                .map(|entity| (entity.id.clone(), entity.clone()))
                .collect(),
            relationships: self
                .graph
                .edge_references()
                .map(|edge| edge.weight().clone())
                .collect(),
            chunk_entities: self
                .chunk_entities
                .iter()
                .map(|(chunk_id, ids)| (chunk_id.clone(), ids.iter().cloned().collect()))
                .collect(),
        }
    }

    /// Serialize the graph to its JSON snapshot document
    pub fn serialize(&self) -> Result<String> {
        serde_json::to_string(&self.to_snapshot())
            .map_err(|e| GraphError::Other(anyhow::Error::new(e)))
    }

    /// Replace all state with the contents of a snapshot.
    ///
    /// On error the graph may be partially populated and should be discarded.
    pub fn load_snapshot(&mut self, snapshot: GraphSnapshot) -> Result<()> {
        self.clear();

        for entity in snapshot.entities.into_values() {
            self.add_entity(entity);
        }
        for relationship in snapshot.relationships {
            self.add_relationship(relationship).map_err(|e| match e {
                GraphError::MissingEndpoint {
                    source_id,
                    target_id,
                } => GraphError::CorruptSnapshot(format!(
                    "relationship {} -> {} references an unknown entity",
                    source_id, target_id
                )),
                other => other,
            })?;
        }

        self.chunk_entities = snapshot
            .chunk_entities
            .into_iter()
            .map(|(chunk_id, ids)| (chunk_id, ids.into_iter().collect()))
            .collect();
        Ok(())
    }

    /// Replace all state with the graph encoded in `json`
    pub fn deserialize(&mut self, json: &str) -> Result<()> {
        let snapshot: GraphSnapshot =
            serde_json::from_str(json).map_err(|e| GraphError::CorruptSnapshot(e.to_string()))?;
        self.load_snapshot(snapshot)
    }

    /// Create a graph from its JSON snapshot document
    pub fn from_json(json: &str) -> Result<Self> {
        let mut graph = Self::new();
        graph.deserialize(json)?;
        Ok(graph)
    }

    /// Get basic statistics about the graph
    pub fn get_statistics(&self) -> GraphStatistics {
        GraphStatistics {
            entity_count: self.graph.node_count(),
            relationship_count: self.graph.edge_count(),
            chunks_with_entities_count: self.chunk_entities.len(),
            weakly_connected_component_count: connected_components(&self.graph),
        }
    }

    /// Drop all entities, relationships and indices
    pub fn clear(&mut self) {
        self.graph.clear();
        self.node_map.clear();
        self.chunk_entities.clear();
    }
}
