use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::graph::error::{GraphError, Result};
use crate::graph::KnowledgeGraph;

#[cfg(test)]
use mockall::automock;

/// Opaque blob storage for serialized graph snapshots
#[cfg_attr(test, automock)]
pub trait SnapshotStore {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&self, key: &str, blob: &str) -> Result<()>;
    fn delete(&self, key: &str) -> Result<()>;
}

/// Stores each snapshot as `<dir>/<key>.json`
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(GraphError::SnapshotStore(e.to_string())),
        }
    }

    fn save(&self, key: &str, blob: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| GraphError::SnapshotStore(e.to_string()))?;
        fs::write(self.path_for(key), blob).map_err(|e| GraphError::SnapshotStore(e.to_string()))
    }

    fn delete(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(GraphError::SnapshotStore(e.to_string())),
        }
    }
}

/// Saves and restores a knowledge graph under a single key
pub struct GraphPersistence<S: SnapshotStore> {
    store: S,
    key: String,
}

impl<S: SnapshotStore> GraphPersistence<S> {
    pub fn new(store: S, key: &str) -> Self {
        Self {
            store,
            key: key.to_string(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn persist(&self, graph: &KnowledgeGraph) -> Result<()> {
        let blob = graph.serialize()?;
        self.store.save(&self.key, &blob)?;
        tracing::info!(key = %self.key, bytes = blob.len(), "Saved knowledge graph snapshot");
        Ok(())
    }

    /// Load the stored graph, or `None` when nothing has been saved yet
    pub fn restore(&self) -> Result<Option<KnowledgeGraph>> {
        let Some(blob) = self.store.load(&self.key)? else {
            tracing::info!(key = %self.key, "No existing graph data found");
            return Ok(None);
        };
        let graph = KnowledgeGraph::from_json(&blob)?;
        tracing::info!(key = %self.key, stats = ?graph.get_statistics(), "Graph loaded");
        Ok(Some(graph))
    }

    pub fn discard(&self) -> Result<()> {
        self.store.delete(&self.key)
    }
}
