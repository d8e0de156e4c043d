//! `tavern query`: rank rules against player input and compose a prompt.

use crate::render;
use anyhow::Context;
use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tavern_core::{DimensionPolicy, TavernConfig};
use tavern_rag::{compose_prompt, Index, OllamaEmbeddings, RulesQuery, ScoredHit};

/// Query command arguments.
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Player input to search for
    pub query: String,

    /// Path to the built index JSON
    #[arg(long)]
    pub index: Option<PathBuf>,

    /// Ollama server URL
    #[arg(long)]
    pub ollama_url: Option<String>,

    /// Embedding model (defaults to the one recorded in the index)
    #[arg(long)]
    pub embed_model: Option<String>,

    /// Number of results to return
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// NPC name used in the composed prompt (defaults to the one in the index)
    #[arg(long)]
    pub npc_name: Option<String>,

    /// Print JSON output including the composed prompt
    #[arg(long)]
    pub json: bool,

    /// Fail when query and index vectors differ in length
    #[arg(long)]
    pub strict_dimensions: bool,
}

impl QueryArgs {
    /// Layer the flags over the loaded configuration.
    pub fn apply(&self, config: &mut TavernConfig) {
        if let Some(index) = &self.index {
            config.rag.index_path = index.clone();
        }
        if let Some(url) = &self.ollama_url {
            config.ollama.base_url = url.clone();
        }
        if let Some(model) = &self.embed_model {
            config.ollama.embed_model = model.clone();
        }
        if let Some(top_k) = self.top_k {
            config.rag.top_k = top_k;
        }
        if self.strict_dimensions {
            config.rag.dimension_policy = DimensionPolicy::Reject;
        }
    }
}

/// JSON shape printed by `--json`.
#[derive(Debug, Serialize)]
pub struct QueryReport<'a> {
    pub query: &'a str,
    pub top_k: usize,
    pub results: &'a [ScoredHit],
    pub composed_prompt: &'a str,
}

/// Run the query command.
pub async fn run(args: QueryArgs, mut config: TavernConfig) -> anyhow::Result<()> {
    args.apply(&mut config);
    config.validate().context("Invalid query settings")?;

    let index_path = &config.rag.index_path;
    let index = Index::load(index_path)
        .with_context(|| format!("Failed to load index from {}", index_path.display()))?;

    // Without an explicit flag, query with the model the index was built with
    if args.embed_model.is_none() && !index.embedding_model.trim().is_empty() {
        config.ollama.embed_model = index.embedding_model.clone();
    }

    let npc_name = args
        .npc_name
        .clone()
        .unwrap_or_else(|| index.npc_name().to_string());

    let embeddings =
        OllamaEmbeddings::from_config(&config).context("Failed to create embedding client")?;
    let search = RulesQuery::new(index, Arc::new(embeddings))
        .with_top_k(config.rag.top_k)
        .with_policy(config.rag.dimension_policy);

    let hits = search.search(&args.query).await.context("Query failed")?;
    let prompt = compose_prompt(&npc_name, &args.query, &hits);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.json {
        let report = QueryReport {
            query: &args.query,
            top_k: config.rag.top_k,
            results: &hits,
            composed_prompt: &prompt,
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        write_plain(&mut out, &hits, &prompt)?;
    }

    Ok(())
}

/// Human-readable output: ranked hits, then the composed prompt.
fn write_plain<W: Write>(out: &mut W, hits: &[ScoredHit], prompt: &str) -> std::io::Result<()> {
    render::render_hits(out, hits)?;
    writeln!(out)?;
    writeln!(out, "Composed prompt:")?;
    writeln!(out, "{}", prompt)
}
