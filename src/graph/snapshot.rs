use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::graph::{edge::Relationship, node::Entity};

/// Persisted form of a knowledge graph.
///
/// `entities` is keyed by entity id, `relationships` holds one record per
/// graph edge (parallel edges included) and `chunk_entities` maps each
/// passage id to the entity ids observed in it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub entities: BTreeMap<String, Entity>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    #[serde(default)]
    pub chunk_entities: BTreeMap<String, Vec<String>>,
}
