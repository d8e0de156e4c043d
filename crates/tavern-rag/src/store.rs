//! Flat embedding index with JSON persistence.

use crate::chunker::{Chunk, Metadata};
use crate::embeddings::EmbeddingProvider;
use crate::error::RagError;
use crate::rules::DEFAULT_NPC_NAME;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// A chunk together with its embedding vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub metadata: Metadata,
    pub embedding: Vec<f32>,
}

impl IndexEntry {
    /// Attach an embedding to a chunk.
    pub fn new(chunk: Chunk, embedding: Vec<f32>) -> Self {
        Self {
            id: chunk.id,
            text: chunk.text,
            metadata: chunk.metadata,
            embedding,
        }
    }
}

/// The on-disk index: the embedding model name and one entry per chunk.
///
/// There is no schema version; an index is rebuilt from scratch whenever the
/// rules change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Index {
    pub embedding_model: String,
    #[serde(default)]
    pub items: Vec<IndexEntry>,
}

impl Index {
    /// Embed every chunk, in order, one request per chunk.
    ///
    /// The first failed embedding aborts the build.
    pub async fn build(chunks: Vec<Chunk>, provider: &dyn EmbeddingProvider) -> Result<Self> {
        let total = chunks.len();
        let mut items = Vec::with_capacity(total);

        for (i, chunk) in chunks.into_iter().enumerate() {
            debug!("Embedding chunk {}/{}: {}", i + 1, total, chunk.id);
            let embedding = provider.embed(&chunk.text).await?;
            items.push(IndexEntry::new(chunk, embedding));
        }

        info!("Embedded {} chunks with {}", items.len(), provider.model());

        Ok(Self {
            embedding_model: provider.model().to_string(),
            items,
        })
    }

    /// Load an index from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RagError::NotFound(path.to_path_buf()));
        }

        let data = std::fs::read_to_string(path)?;
        let index: Self = serde_json::from_str(&data)?;
        debug!(
            "Loaded index with {} items ({}) from {}",
            index.items.len(),
            index.embedding_model,
            path.display()
        );
        Ok(index)
    }

    /// Write the index to disk, replacing any previous file.
    ///
    /// Writes to a temporary file first, then renames to the target path.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let tmp_path = path.with_extension("tmp");
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(&tmp_path, data)?;
        std::fs::rename(&tmp_path, path)?;
        Ok(())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the index has no entries.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// NPC name recorded in the first entry's metadata.
    pub fn npc_name(&self) -> &str {
        self.items
            .first()
            .and_then(|item| item.metadata.get("npc_name"))
            .and_then(|name| name.as_str())
            .unwrap_or(DEFAULT_NPC_NAME)
    }
}
