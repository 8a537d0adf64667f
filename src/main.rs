use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use walkdir::WalkDir;

use course_knowledge_graph::graph::{CentralityMeasure, FileSnapshotStore};
use course_knowledge_graph::{Config, GraphBuilder, GraphPersistence, KnowledgeGraph, Passage};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding graph snapshots (overrides GRAPH_SNAPSHOT_DIR)
    #[arg(short = 'd', long)]
    snapshot_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a fresh graph from passage files and save it
    Build { input: PathBuf },
    /// Merge passage files into the saved graph
    Update { input: PathBuf },
    /// Print statistics, type distribution and central entities
    Summary,
    /// List passages related to a passage id
    Related {
        chunk_id: String,
        #[arg(long)]
        depth: Option<usize>,
    },
    /// Show the one-hop connections of an entity
    Connections { name: String },
    /// Shortest path between two entity ids
    Path { source: String, target: String },
    /// Delete the saved graph
    Reset,
    /// Rank entities by a centrality measure
    Centrality {
        measure: String,
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
}

/// Read passages from `.json` arrays and `.jsonl` records under `input`
fn load_passages(input: &Path) -> Result<Vec<Passage>> {
    let mut passages = Vec::new();
    for entry in WalkDir::new(input).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let content = match extension {
            "json" | "jsonl" => std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?,
            _ => continue,
        };

        if extension == "json" {
            let batch: Vec<Passage> = serde_json::from_str(&content)
                .with_context(|| format!("parsing {}", path.display()))?;
            passages.extend(batch);
        } else {
            for line in content.lines().filter(|l| !l.trim().is_empty()) {
                passages.push(
                    serde_json::from_str(line)
                        .with_context(|| format!("parsing {}", path.display()))?,
                );
            }
        }
    }
    tracing::info!("Loaded {} passages from {}", passages.len(), input.display());
    Ok(passages)
}

fn restore_or_empty(persistence: &GraphPersistence<FileSnapshotStore>) -> Result<KnowledgeGraph> {
    Ok(persistence.restore()?.unwrap_or_default())
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    let mut config = Config::from_env()?;
    if let Some(dir) = args.snapshot_dir {
        config.snapshot.dir = dir;
    }

    let level = tracing::Level::from_str(&config.logging.log_level).unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let persistence = GraphPersistence::new(
        FileSnapshotStore::new(&config.snapshot.dir),
        &config.snapshot.key,
    );

    match args.command {
        Command::Build { input } => {
            let passages = load_passages(&input)?;
            let mut builder = GraphBuilder::new();
            let graph = builder.build_from_passages(&passages);
            persistence.persist(graph)?;
            println!("{}", serde_json::to_string_pretty(&graph.get_statistics())?);
        }
        Command::Update { input } => {
            let passages = load_passages(&input)?;
            let mut graph = restore_or_empty(&persistence)?;
            GraphBuilder::new().update_with_new_passages(&passages, &mut graph);
            persistence.persist(&graph)?;
            println!("{}", serde_json::to_string_pretty(&graph.get_statistics())?);
        }
        Command::Reset => {
            persistence.discard()?;
            println!("Removed snapshot {}", persistence.key());
        }
        Command::Summary => {
            let builder = GraphBuilder::with_graph_store(restore_or_empty(&persistence)?);
            println!("{}", serde_json::to_string_pretty(&builder.get_graph_summary())?);
        }
        Command::Related { chunk_id, depth } => {
            let builder = GraphBuilder::with_graph_store(restore_or_empty(&persistence)?);
            let depth = depth.unwrap_or(config.query.related_max_depth);
            for related in builder.find_related_chunks(&chunk_id, depth) {
                println!("{}", related);
            }
        }
        Command::Connections { name } => {
            let builder = GraphBuilder::with_graph_store(restore_or_empty(&persistence)?);
            let connections = builder.get_entity_connections(&name)?;
            println!("{}", serde_json::to_string_pretty(&connections)?);
        }
        Command::Path { source, target } => {
            let graph = restore_or_empty(&persistence)?;
            match graph.find_shortest_path(&source, &target) {
                Some(path) => println!("{}", path.join(" -> ")),
                None => println!("No path between {} and {}", source, target),
            }
        }
        Command::Centrality { measure, top } => {
            let graph = restore_or_empty(&persistence)?;
            let measure: CentralityMeasure = measure.parse()?;
            let scores = graph.centrality(measure)?;
            let mut ranked: Vec<_> = graph
                .entities()
                .filter_map(|e| scores.get(&e.id).map(|s| (e, *s)))
                .collect();
            ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
            for (entity, score) in ranked.into_iter().take(top) {
                println!("{:.4}\t{}\t{} ({})", score, entity.id, entity.name, entity.entity_type);
            }
        }
    }

    Ok(())
}
