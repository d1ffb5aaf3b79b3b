//! Dequel CLI
//!
//! Command-line interface for inspecting Dequel queries: dump syntax trees,
//! list conditions, report syntax errors, and compute completions against
//! schema files on disk.
//!
//! # Usage
//!
//! ```bash
//! dequel tree "status:open -archived:true"
//! dequel conditions "title:foo status:open" --json
//! dequel check "title:"
//! dequel complete "author.na" --schema-dir ./schemas --collection books
//! ```

#![deny(unsafe_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{ensure, Context, Result};
use clap::{Parser, Subcommand};

use dequel_core::complete::complete_at;
use dequel_core::condition::{parse_condition, serialize_condition, ConditionParts};
use dequel_core::schema::{Schema, SchemaCache, StaticFetcher};
use dequel_core::syntax::{diagnostics, node_path, parse, SyntaxTree};

/// Dequel CLI - inspect, check, and complete Dequel queries
#[derive(Parser)]
#[command(name = "dequel")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the syntax tree of a query
    Tree {
        /// Query text
        query: String,

        /// Also print the node path at this byte offset
        #[arg(short, long)]
        pos: Option<usize>,
    },

    /// List the conditions of a query
    Conditions {
        /// Query text
        query: String,

        /// Emit JSON instead of one condition per line
        #[arg(long)]
        json: bool,
    },

    /// Report syntax errors, exiting non-zero when any are found
    Check {
        /// Query text
        query: String,

        /// Emit JSON instead of one diagnostic per line
        #[arg(long)]
        json: bool,
    },

    /// Compute completions at a cursor position
    Complete {
        /// Query text
        query: String,

        /// Cursor byte offset, defaulting to the end of the query
        #[arg(short, long)]
        pos: Option<usize>,

        /// Directory of {collection}.json schema files
        #[arg(long, env = "DEQUEL_SCHEMA_DIR")]
        schema_dir: PathBuf,

        /// Collection the query runs against
        #[arg(short, long, env = "DEQUEL_COLLECTION")]
        collection: String,

        /// Emit JSON instead of one option per line
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Tree { query, pos } => run_tree(&query, pos),
        Commands::Conditions { query, json } => run_conditions(&query, json),
        Commands::Check { query, json } => {
            let clean = run_check(&query, json)?;
            if !clean {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Complete {
            query,
            pos,
            schema_dir,
            collection,
            json,
        } => run_complete(&query, pos, &schema_dir, &collection, json).await,
    }
}

fn run_tree(query: &str, pos: Option<usize>) -> Result<()> {
    let tree = parse(query);
    print!("{}", tree.dump(query));

    if let Some(pos) = pos {
        checked_pos(query, pos)?;
        let node = tree.resolve(pos);
        println!("path at {pos}: {}", node_path(&tree, node).join(" > "));
    }
    Ok(())
}

fn run_conditions(query: &str, json: bool) -> Result<()> {
    let tree = parse(query);
    let conditions = query_conditions(&tree, query);

    if json {
        println!("{}", serde_json::to_string_pretty(&conditions)?);
        return Ok(());
    }
    for parts in &conditions {
        println!(
            "{}\tprefix={:?} field={:?} predicate={:?}",
            serialize_condition(parts),
            parts.prefix.as_str(),
            parts.field,
            parts.predicate
        );
    }
    Ok(())
}

/// Collects the parts of every condition in the tree, in document order.
fn query_conditions(tree: &SyntaxTree, query: &str) -> Vec<ConditionParts> {
    tree.preorder()
        .filter(|&id| tree.kind(id).is_condition())
        .map(|id| parse_condition(tree, id, query))
        .collect()
}

fn run_check(query: &str, json: bool) -> Result<bool> {
    let found = diagnostics(&parse(query));

    if json {
        println!("{}", serde_json::to_string_pretty(&found)?);
    } else if found.is_empty() {
        println!("No syntax errors");
    } else {
        for diagnostic in &found {
            println!(
                "[{}, {}) {}",
                diagnostic.from, diagnostic.to, diagnostic.message
            );
        }
    }
    Ok(found.is_empty())
}

async fn run_complete(
    query: &str,
    pos: Option<usize>,
    schema_dir: &Path,
    collection: &str,
    json: bool,
) -> Result<()> {
    let pos = pos.unwrap_or(query.len());
    checked_pos(query, pos)?;

    let fetcher = Arc::new(load_schemas(schema_dir)?);
    let cache = SchemaCache::new(fetcher);
    let base = cache.get(collection).await;

    let tree = parse(query);
    let result = complete_at(query, &tree, pos, base, &cache).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }
    match result {
        None => println!("No completions at position {pos}"),
        Some(result) => {
            println!("replacing from {}:", result.from);
            for option in &result.options {
                match &option.info {
                    Some(info) => println!("  {} ({}) - {info}", option.label, option.kind),
                    None => println!("  {} ({})", option.label, option.kind),
                }
            }
        }
    }
    Ok(())
}

/// Loads every `{collection}.json` file in `dir` into a [`StaticFetcher`]
/// keyed by file stem.
fn load_schemas(dir: &Path) -> Result<StaticFetcher> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("reading schema directory {}", dir.display()))?;

    let mut fetcher = StaticFetcher::new();
    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let schema: Schema = serde_json::from_str(&text)
            .with_context(|| format!("parsing schema file {}", path.display()))?;
        tracing::debug!(collection = name, "loaded schema");
        fetcher = fetcher.with_schema(name, schema);
    }
    Ok(fetcher)
}

fn checked_pos(query: &str, pos: usize) -> Result<()> {
    ensure!(
        pos <= query.len() && query.is_char_boundary(pos),
        "position {pos} is not a character boundary of the query ({} bytes)",
        query.len()
    );
    Ok(())
}
