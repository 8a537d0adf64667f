use assert_fs::prelude::*;
use predicates::prelude::*;
use std::process::{Command, Output};

const PASSAGES: &str = r#"[
  {"content": "Python is used with Flask framework", "course_title": "Web Dev", "lesson_number": 1, "chunk_index": 0},
  {"content": "Deploy Flask apps with Docker", "course_title": "Web Dev", "lesson_number": 2, "chunk_index": 1}
]"#;

const MORE_PASSAGES: &str = r#"{"content": "Docker images for Rust services", "course_title": "Systems", "lesson_number": 1, "chunk_index": 0}
{"content": "Rust ownership rules", "course_title": "Systems", "chunk_index": 1}
"#;

fn kg(temp: &assert_fs::TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_kg"))
        .current_dir(temp.path())
        .env_remove("GRAPH_SNAPSHOT_DIR")
        .env_remove("GRAPH_SNAPSHOT_KEY")
        .env("LOG_LEVEL", "warn")
        .arg("-d")
        .arg(temp.child("graphs").path())
        .args(args)
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn test_build_writes_snapshot() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("input/passages.json").write_str(PASSAGES).unwrap();

    let output = kg(&temp, &["build", "input"]);
    assert!(output.status.success());

    let statistics: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(statistics["chunks_with_entities_count"], 2);

    let snapshot = temp.child("graphs/knowledge_graph.json");
    snapshot.assert(predicate::path::exists());
    snapshot.assert(predicate::str::contains("\"chunk_entities\""));
    snapshot.assert(predicate::str::contains("Web_Dev_1"));
}

#[test]
fn test_update_merges_into_existing_snapshot() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("first/passages.json").write_str(PASSAGES).unwrap();
    temp.child("second/passages.jsonl").write_str(MORE_PASSAGES).unwrap();

    assert!(kg(&temp, &["build", "first"]).status.success());
    let output = kg(&temp, &["update", "second"]);
    assert!(output.status.success());

    let statistics: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(statistics["chunks_with_entities_count"], 4);

    let related = kg(&temp, &["related", "Web_Dev_1", "--depth", "1"]);
    assert!(related.status.success());
    assert!(predicate::str::contains("Systems_0").eval(&stdout(&related)));
    assert!(!stdout(&related).lines().any(|line| line == "Web_Dev_1"));
}

#[test]
fn test_queries_against_saved_graph() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("input/passages.json").write_str(PASSAGES).unwrap();
    assert!(kg(&temp, &["build", "input"]).status.success());

    let summary = kg(&temp, &["summary"]);
    assert!(summary.status.success());
    let summary: serde_json::Value = serde_json::from_str(&stdout(&summary)).unwrap();
    assert_eq!(summary["entity_type_distribution"]["course"], 1);
    assert_eq!(summary["entity_type_distribution"]["lesson"], 2);

    let connections = kg(&temp, &["connections", "flask"]);
    assert!(connections.status.success());
    let connections: serde_json::Value = serde_json::from_str(&stdout(&connections)).unwrap();
    assert_eq!(connections["entity"], "Flask");
    assert_eq!(connections["type"], "technology");

    let centrality = kg(&temp, &["centrality", "degree", "--top", "3"]);
    assert!(centrality.status.success());
    assert_eq!(stdout(&centrality).lines().count(), 3);
}

#[test]
fn test_unknown_measure_fails() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("input/passages.json").write_str(PASSAGES).unwrap();
    assert!(kg(&temp, &["build", "input"]).status.success());

    let output = kg(&temp, &["centrality", "eigenvector"]);
    assert!(!output.status.success());
    assert!(predicate::str::contains("eigenvector").eval(&String::from_utf8_lossy(&output.stderr)));
}

#[test]
fn test_missing_snapshot_queries_empty_graph() {
    let temp = assert_fs::TempDir::new().unwrap();

    let output = kg(&temp, &["related", "Web_Dev_0"]);
    assert!(output.status.success());
    assert!(stdout(&output).is_empty());
    temp.child("graphs/knowledge_graph.json")
        .assert(predicate::path::missing());
}

#[test]
fn test_reset_removes_snapshot() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("input/passages.json").write_str(PASSAGES).unwrap();
    assert!(kg(&temp, &["build", "input"]).status.success());
    temp.child("graphs/knowledge_graph.json")
        .assert(predicate::path::exists());

    let output = kg(&temp, &["reset"]);
    assert!(output.status.success());
    assert!(predicate::str::contains("knowledge_graph").eval(&stdout(&output)));
    temp.child("graphs/knowledge_graph.json")
        .assert(predicate::path::missing());

    assert!(kg(&temp, &["reset"]).status.success());
}
