use serde::{Deserialize, Serialize};

/// A text chunk from a course, as produced by the ingestion pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    pub content: String,
    pub course_title: String,
    #[serde(default)]
    pub lesson_number: Option<i64>,
    /// Position of this chunk within its course
    pub chunk_index: usize,
}

impl Passage {
    pub fn new(
        content: impl Into<String>,
        course_title: impl Into<String>,
        lesson_number: Option<i64>,
        chunk_index: usize,
    ) -> Self {
        Self {
            content: content.into(),
            course_title: course_title.into(),
            lesson_number,
            chunk_index,
        }
    }

    /// Join key between passages, entities and relationships
    pub fn chunk_id(&self) -> String {
        chunk_id(&self.course_title, self.chunk_index)
    }
}

/// `"{course title with spaces as underscores}_{chunk index}"`
pub fn chunk_id(course_title: &str, chunk_index: usize) -> String {
    format!("{}_{}", course_title.replace(' ', "_"), chunk_index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_id() {
        let passage = Passage::new("text", "Web Dev Basics", Some(2), 7);
        assert_eq!(passage.chunk_id(), "Web_Dev_Basics_7");
        assert_eq!(chunk_id("MCP", 0), "MCP_0");
    }

    #[test]
    fn test_lesson_number_is_optional() {
        let passage: Passage =
            serde_json::from_str(r#"{"content":"x","course_title":"A","chunk_index":3}"#).unwrap();
        assert!(passage.lesson_number.is_none());
        assert_eq!(passage.chunk_id(), "A_3");
    }
}
