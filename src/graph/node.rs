use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Type of knowledge graph entity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Concept,
    Person,
    Technology,
    Tool,
    Method,
    Organization,
    Course,
    Lesson,
}

impl EntityType {
    pub const ALL: [EntityType; 8] = [
        EntityType::Concept,
        EntityType::Person,
        EntityType::Technology,
        EntityType::Tool,
        EntityType::Method,
        EntityType::Organization,
        EntityType::Course,
        EntityType::Lesson,
    ];

    /// Tag used in snapshots and entity id derivation
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Concept => "concept",
            EntityType::Person => "person",
            EntityType::Technology => "technology",
            EntityType::Tool => "tool",
            EntityType::Method => "method",
            EntityType::Organization => "organization",
            EntityType::Course => "course",
            EntityType::Lesson => "lesson",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown entity type: {}", s))
    }
}

/// Represents a typed, named node in the knowledge graph
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entity {
    /// Stable identifier derived from name and type
    pub id: String,
    /// Display label
    pub name: String,
    pub entity_type: EntityType,
    #[serde(default)]
    pub description: Option<String>,
    /// Passages where this entity was observed
    #[serde(default)]
    pub chunk_ids: BTreeSet<String>,
}

impl Entity {
    /// Create an entity whose id is derived from its name and type
    pub fn new(name: impl Into<String>, entity_type: EntityType, chunk_id: &str) -> Self {
        let name = name.into();
        let id = generate_entity_id(&name, entity_type);
        Self::with_id(id, name, entity_type, chunk_id)
    }

    /// Create an entity with an explicit id
    pub fn with_id(
        id: impl Into<String>,
        name: impl Into<String>,
        entity_type: EntityType,
        chunk_id: &str,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            entity_type,
            description: None,
            chunk_ids: BTreeSet::from([chunk_id.to_string()]),
        }
    }

    /// Union another provenance set into this entity
    pub fn merge_chunk_ids<'a>(&mut self, chunk_ids: impl IntoIterator<Item = &'a String>) {
        self.chunk_ids.extend(chunk_ids.into_iter().cloned());
    }
}

/// Generate a consistent entity id from a name and type.
///
/// The name is lower-cased, trimmed and has spaces replaced by underscores
/// before being combined with the type tag, so `" Python "` and `"python"`
/// share an id while the same name under another type does not.
pub fn generate_entity_id(name: &str, entity_type: EntityType) -> String {
    let normalized = name.to_lowercase().trim().replace(' ', "_");
    let digest = md5::compute(format!("{}_{}", entity_type.as_str(), normalized).as_bytes());
    let mut id = format!("{:x}", digest);
    id.truncate(12);
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_creation() {
        let entity = Entity::new("Python", EntityType::Technology, "Web_Dev_0");

        assert_eq!(entity.name, "Python");
        assert_eq!(entity.entity_type, EntityType::Technology);
        assert_eq!(entity.id, generate_entity_id("Python", EntityType::Technology));
        assert!(entity.description.is_none());
        assert_eq!(entity.chunk_ids, BTreeSet::from(["Web_Dev_0".to_string()]));
    }

    #[test]
    fn test_id_stability() {
        let id = generate_entity_id("Python", EntityType::Technology);

        assert_eq!(id.len(), 12);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(id, generate_entity_id(" python ", EntityType::Technology));
        assert_eq!(id, generate_entity_id("PYTHON", EntityType::Technology));
        assert_ne!(id, generate_entity_id("Python", EntityType::Tool));
    }

    #[test]
    fn test_id_normalizes_inner_spaces() {
        assert_eq!(
            generate_entity_id("Machine Learning", EntityType::Technology),
            generate_entity_id("machine_learning", EntityType::Technology)
        );
    }

    #[test]
    fn test_merge_chunk_ids() {
        let mut entity = Entity::new("Flask", EntityType::Technology, "a_0");
        let other = Entity::new("Flask", EntityType::Technology, "b_1");

        entity.merge_chunk_ids(&other.chunk_ids);
        entity.merge_chunk_ids(&other.chunk_ids);

        assert_eq!(entity.chunk_ids.len(), 2);
    }

    #[test]
    fn test_entity_type_round_trip() {
        for entity_type in EntityType::ALL {
            assert_eq!(entity_type.as_str().parse::<EntityType>(), Ok(entity_type));
        }
        assert!("widget".parse::<EntityType>().is_err());
        assert_eq!(
            serde_json::to_string(&EntityType::Organization).unwrap(),
            "\"organization\""
        );
    }
}
