use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::graph::KnowledgeGraph;
use crate::passage::chunk_id;

/// Metadata of a primary search hit returned by the vector store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub course_title: String,
    #[serde(default)]
    pub chunk_index: usize,
}

impl SearchHit {
    pub fn chunk_id(&self) -> String {
        chunk_id(&self.course_title, self.chunk_index)
    }
}

/// Primary hits plus the passages the graph links them to
#[derive(Debug, Clone, Default, Serialize)]
pub struct GraphExpansion {
    pub primary_chunk_ids: Vec<String>,
    pub related_chunk_ids: Vec<String>,
}

/// Expand search hits with passages that share related entities.
///
/// Primary passages never appear among the related ones, and at most
/// `max_related` related ids are returned.
pub fn expand_search_hits(
    graph: &KnowledgeGraph,
    hits: &[SearchHit],
    max_depth: usize,
    max_related: usize,
) -> GraphExpansion {
    let primary_chunk_ids: Vec<String> = hits.iter().map(SearchHit::chunk_id).collect();

    let mut related = BTreeSet::new();
    for chunk in &primary_chunk_ids {
        for entity in graph.get_entities_in_chunk(chunk) {
            let related_entities = graph.get_related_entities(&entity.id, None, max_depth);
            related.extend(graph.get_chunks_for_entities(&related_entities));
        }
    }
    for chunk in &primary_chunk_ids {
        related.remove(chunk);
    }

    tracing::debug!(
        primary = primary_chunk_ids.len(),
        related = related.len(),
        "Expanded search hits through knowledge graph"
    );

    GraphExpansion {
        primary_chunk_ids,
        related_chunk_ids: related.into_iter().take(max_related).collect(),
    }
}
