//! Rule-based entity and relationship extraction.
//!
//! Entities come from case-insensitive keyword matches, the passage's course
//! and lesson, and identifier-like tokens in the raw text. Relationships are
//! inferred from the mix of entity types found in the same passage.

pub mod keywords;

use regex::Regex;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::graph::{generate_entity_id, Entity, EntityType, RelationType, Relationship};
use crate::passage::Passage;

use keywords::{CAPS_STOPLIST, KEYWORD_RULES};

const SUBJECT_TYPES: [EntityType; 3] = [EntityType::Technology, EntityType::Tool, EntityType::Method];

/// Extracts entities and relationships from course passages
pub struct EntityExtractor {
    camel_case: Regex,
    capitals: Regex,
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityExtractor {
    pub fn new() -> Self {
        Self {
            camel_case: Regex::new(r"\b[a-z]+[A-Z][a-zA-Z]*\b").expect("valid camel case pattern"),
            capitals: Regex::new(r"\b[A-Z]{2,}\b").expect("valid capitals pattern"),
        }
    }

    /// Extract entities from a single passage
    pub fn extract(&self, passage: &Passage) -> Vec<Entity> {
        let chunk_id = passage.chunk_id();
        let content = passage.content.to_lowercase();

        let mut entities = Vec::new();
        for (entity_type, words) in KEYWORD_RULES {
            for word in words.iter().filter(|word| content.contains(**word)) {
                entities.push(Entity::new(title_case(word), *entity_type, &chunk_id));
            }
        }

        entities.extend(self.structural_entities(passage, &chunk_id));
        entities.extend(self.identifier_entities(&passage.content, &chunk_id));
        entities
    }

    /// The course entity and, when the passage has one, its lesson entity
    fn structural_entities(&self, passage: &Passage, chunk_id: &str) -> Vec<Entity> {
        let mut entities = vec![Entity::new(
            passage.course_title.clone(),
            EntityType::Course,
            chunk_id,
        )];

        if let Some(number) = passage.lesson_number {
            let lesson_name = format!("Lesson {}", number);
            // scoped by course so equal lesson numbers in different courses stay distinct
            let id = generate_entity_id(
                &format!("{}_{}", passage.course_title, lesson_name),
                EntityType::Lesson,
            );
            entities.push(Entity::with_id(id, lesson_name, EntityType::Lesson, chunk_id));
        }

        entities
    }

    /// camelCase identifiers and ALL-CAPS tokens become concepts
    fn identifier_entities(&self, content: &str, chunk_id: &str) -> Vec<Entity> {
        let mut seen = HashSet::new();
        let camel = self
            .camel_case
            .find_iter(content)
            .map(|m| m.as_str())
            .filter(|token| token.chars().count() > 3);
        let caps = self
            .capitals
            .find_iter(content)
            .map(|m| m.as_str())
            .filter(|token| !CAPS_STOPLIST.contains(token));

        camel
            .chain(caps)
            .filter(|token| seen.insert(*token))
            .map(|token| Entity::new(token, EntityType::Concept, chunk_id))
            .collect()
    }

    /// Infer relationships from the types of entities found in one passage
    pub fn infer_relationships(&self, entities: &[Entity], passage: &Passage) -> Vec<Relationship> {
        let chunk_id = passage.chunk_id();
        let mut by_type: HashMap<EntityType, Vec<&Entity>> = HashMap::new();
        for entity in entities {
            by_type.entry(entity.entity_type).or_default().push(entity);
        }
        let none = Vec::new();
        let of = |entity_type: EntityType| by_type.get(&entity_type).unwrap_or(&none).as_slice();

        let mut relationships = Vec::new();
        let mut link = |sources: &[&Entity], targets: &[&Entity], relation_type: RelationType| {
            for source in sources {
                for target in targets {
                    relationships.push(Relationship::new(
                        source.id.clone(),
                        target.id.clone(),
                        relation_type,
                        &chunk_id,
                    ));
                }
            }
        };

        link(of(EntityType::Course), of(EntityType::Lesson), RelationType::PartOf);

        for structural in [EntityType::Course, EntityType::Lesson] {
            for subject in SUBJECT_TYPES {
                link(of(structural), of(subject), RelationType::Teaches);
            }
        }

        link(of(EntityType::Technology), of(EntityType::Tool), RelationType::Uses);

        for subject in SUBJECT_TYPES {
            link(of(EntityType::Concept), of(subject), RelationType::RelatesTo);
        }

        relationships
    }
}

/// Merge entities from several passages, unioning `chunk_ids` of equal ids.
///
/// Fields other than `chunk_ids` come from the first occurrence.
pub fn merge_entities(entity_lists: Vec<Vec<Entity>>) -> BTreeMap<String, Entity> {
    let mut merged: BTreeMap<String, Entity> = BTreeMap::new();
    for entity in entity_lists.into_iter().flatten() {
        match merged.get_mut(&entity.id) {
            Some(existing) => existing.merge_chunk_ids(&entity.chunk_ids),
            None => {
                merged.insert(entity.id.clone(), entity);
            }
        }
    }
    merged
}

/// Merge relationships sharing `(source, target, relation_type)`, unioning `chunk_ids`.
///
/// The first occurrence's confidence wins; later values are dropped.
pub fn merge_relationships(relationship_lists: Vec<Vec<Relationship>>) -> Vec<Relationship> {
    let mut positions = HashMap::new();
    let mut merged: Vec<Relationship> = Vec::new();
    for relationship in relationship_lists.into_iter().flatten() {
        match positions.get(&relationship.key()) {
            Some(&pos) => {
                let existing: &mut Relationship = &mut merged[pos];
                existing.chunk_ids.extend(relationship.chunk_ids);
            }
            None => {
                positions.insert(relationship.key(), merged.len());
                merged.push(relationship);
            }
        }
    }
    merged
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest
pub fn title_case(word: &str) -> String {
    let mut result = String::with_capacity(word.len());
    let mut previous_cased = false;
    for c in word.chars() {
        if previous_cased {
            result.extend(c.to_lowercase());
        } else {
            result.extend(c.to_uppercase());
        }
        previous_cased = c.is_lowercase() || c.is_uppercase();
    }
    result
}
