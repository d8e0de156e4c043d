//! `tavern build`: embed a rules file into an index.

use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use tavern_core::TavernConfig;
use tavern_rag::{chunk_rules, EmbeddingProvider, Index, OllamaEmbeddings, RulesDocument};
use tracing::info;

/// Build command arguments.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Path to rules JSON
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// Output index JSON path
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Ollama server URL
    #[arg(long)]
    pub ollama_url: Option<String>,

    /// Embedding model
    #[arg(long)]
    pub embed_model: Option<String>,
}

impl BuildArgs {
    /// Layer the flags over the loaded configuration.
    pub fn apply(&self, config: &mut TavernConfig) {
        if let Some(rules) = &self.rules {
            config.rag.rules_path = rules.clone();
        }
        if let Some(out) = &self.out {
            config.rag.index_path = out.clone();
        }
        if let Some(url) = &self.ollama_url {
            config.ollama.base_url = url.clone();
        }
        if let Some(model) = &self.embed_model {
            config.ollama.embed_model = model.clone();
        }
    }
}

/// Run the build command.
pub async fn run(args: BuildArgs, mut config: TavernConfig) -> anyhow::Result<()> {
    args.apply(&mut config);
    config.validate().context("Invalid build settings")?;

    let rules_path = &config.rag.rules_path;
    let out_path = &config.rag.index_path;

    let rules = RulesDocument::load(rules_path)
        .with_context(|| format!("Failed to read rules from {}", rules_path.display()))?;

    let chunks = chunk_rules(&rules);
    if chunks.is_empty() {
        anyhow::bail!(
            "Rules file {} has nothing to index (no persona, safety, or operational rules)",
            rules_path.display()
        );
    }
    info!("Chunked {} into {} passages", rules_path.display(), chunks.len());

    let embeddings =
        OllamaEmbeddings::from_config(&config).context("Failed to create embedding client")?;
    info!("Embedding with {} at {}", embeddings.model(), embeddings.base_url());

    let index = Index::build(chunks, &embeddings)
        .await
        .context("Failed to build index")?;
    index
        .save(out_path)
        .with_context(|| format!("Failed to write index to {}", out_path.display()))?;

    println!("Built index with {} items → {}", index.len(), out_path.display());
    Ok(())
}
