use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    pub dir: String,
    pub key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    pub related_max_depth: usize,
    pub max_related_chunks: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub snapshot: SnapshotConfig,
    pub query: QueryConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let snapshot = SnapshotConfig {
            dir: env::var("GRAPH_SNAPSHOT_DIR").unwrap_or_else(|_| "./graph_data".to_string()),
            key: env::var("GRAPH_SNAPSHOT_KEY").unwrap_or_else(|_| "knowledge_graph".to_string()),
        };

        let query = QueryConfig {
            related_max_depth: env::var("GRAPH_RELATED_MAX_DEPTH")
                .unwrap_or_else(|_| "2".to_string())
                .parse()
                .unwrap_or(2),
            max_related_chunks: env::var("GRAPH_MAX_RELATED_CHUNKS")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .unwrap_or(3),
        };

        let logging = LoggingConfig {
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        };

        Ok(Self {
            snapshot,
            query,
            logging,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scopeguard::guard;
    use std::env;

    fn clean_env() {
        env::remove_var("GRAPH_SNAPSHOT_DIR");
        env::remove_var("GRAPH_SNAPSHOT_KEY");
        env::remove_var("GRAPH_RELATED_MAX_DEPTH");
        env::remove_var("GRAPH_MAX_RELATED_CHUNKS");
        env::remove_var("LOG_LEVEL");
    }

    #[test]
    #[serial_test::serial]
    fn test_default_config() {
        clean_env();
        let _guard = guard((), |_| clean_env());

        let config = Config::from_env().unwrap();

        assert_eq!(config.snapshot.dir, "./graph_data", "wrong default snapshot dir");
        assert_eq!(config.snapshot.key, "knowledge_graph", "wrong default snapshot key");
        assert_eq!(config.query.related_max_depth, 2, "wrong default depth");
        assert_eq!(config.query.max_related_chunks, 3, "wrong default related cap");
        assert_eq!(config.logging.log_level, "info", "wrong default log level");
    }

    #[test]
    #[serial_test::serial]
    fn test_custom_config() {
        clean_env();
        let _guard = guard((), |_| clean_env());

        env::set_var("GRAPH_SNAPSHOT_DIR", "/custom/graphs");
        env::set_var("GRAPH_SNAPSHOT_KEY", "courses");
        env::set_var("GRAPH_RELATED_MAX_DEPTH", "3");
        env::set_var("GRAPH_MAX_RELATED_CHUNKS", "not-a-number");

        let config = Config::from_env().unwrap();

        assert_eq!(config.snapshot.dir, "/custom/graphs", "snapshot dir mismatch");
        assert_eq!(config.snapshot.key, "courses", "snapshot key mismatch");
        assert_eq!(config.query.related_max_depth, 3, "depth mismatch");
        assert_eq!(
            config.query.max_related_chunks, 3,
            "unparseable value should fall back to default"
        );
    }
}
