use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Type of relationship between entities
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    Teaches,      // Course or lesson covers a subject
    Uses,         // Technology relies on a tool
    Implements,   // Not inferred automatically
    PartOf,       // Lesson belongs to a course
    RelatesTo,    // Concept touches a subject
    Prerequisite, // Not inferred automatically
    ExampleOf,    // Not inferred automatically
    MentionedIn,  // Not inferred automatically
}

impl RelationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationType::Teaches => "teaches",
            RelationType::Uses => "uses",
            RelationType::Implements => "implements",
            RelationType::PartOf => "part_of",
            RelationType::RelatesTo => "relates_to",
            RelationType::Prerequisite => "prerequisite",
            RelationType::ExampleOf => "example_of",
            RelationType::MentionedIn => "mentioned_in",
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_confidence() -> f64 {
    1.0
}

/// Represents a directed, typed relationship between two entities
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Relationship {
    pub source_entity_id: String,
    pub target_entity_id: String,
    pub relation_type: RelationType,
    /// Confidence score in [0.0, 1.0]
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    /// Passages supporting this relationship
    #[serde(default)]
    pub chunk_ids: BTreeSet<String>,
}

/// Merge identity of a relationship
pub type RelationshipKey = (String, String, RelationType);

impl Relationship {
    /// Create a new relationship with full confidence
    pub fn new(
        source_entity_id: impl Into<String>,
        target_entity_id: impl Into<String>,
        relation_type: RelationType,
        chunk_id: &str,
    ) -> Self {
        Self {
            source_entity_id: source_entity_id.into(),
            target_entity_id: target_entity_id.into(),
            relation_type,
            confidence: default_confidence(),
            chunk_ids: BTreeSet::from([chunk_id.to_string()]),
        }
    }

    /// Set the confidence score
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn key(&self) -> RelationshipKey {
        (
            self.source_entity_id.clone(),
            self.target_entity_id.clone(),
            self.relation_type,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relationship_creation() {
        let rel = Relationship::new("tech_python", "tech_flask", RelationType::Uses, "chunk1");

        assert_eq!(rel.source_entity_id, "tech_python");
        assert_eq!(rel.target_entity_id, "tech_flask");
        assert_eq!(rel.relation_type, RelationType::Uses);
        assert_eq!(rel.confidence, 1.0);
        assert!(rel.chunk_ids.contains("chunk1"));
    }

    #[test]
    fn test_confidence_defaults_when_missing() {
        let rel: Relationship = serde_json::from_str(
            r#"{"source_entity_id":"a","target_entity_id":"b","relation_type":"part_of"}"#,
        )
        .unwrap();

        assert_eq!(rel.relation_type, RelationType::PartOf);
        assert_eq!(rel.confidence, 1.0);
        assert!(rel.chunk_ids.is_empty());
    }

    #[test]
    fn test_unknown_relation_type_rejected() {
        let parsed: Result<Relationship, _> = serde_json::from_str(
            r#"{"source_entity_id":"a","target_entity_id":"b","relation_type":"owns"}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn test_key_ignores_confidence() {
        let a = Relationship::new("a", "b", RelationType::Teaches, "c_0");
        let b = Relationship::new("a", "b", RelationType::Teaches, "c_1").with_confidence(0.4);

        assert_eq!(a.key(), b.key());
        assert_ne!(
            a.key(),
            Relationship::new("a", "b", RelationType::Uses, "c_0").key()
        );
    }
}
