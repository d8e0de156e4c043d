//! Rules retrieval for tavern NPCs.
//!
//! This crate provides:
//! - Chunking of a rules/persona document into retrievable passages
//! - Embedding generation via an Ollama-compatible service
//! - A flat JSON index and cosine ranking over it
//! - Composition of a grounded roleplay prompt from the top hits

pub mod chunker;
pub mod compose;
pub mod embeddings;
pub mod error;
pub mod rules;
pub mod search;
pub mod store;

pub use chunker::{chunk_rules, Chunk, Metadata};
pub use compose::compose_prompt;
pub use embeddings::{EmbeddingProvider, OllamaEmbeddings};
pub use error::RagError;
pub use rules::{RulesDocument, DEFAULT_NPC_NAME};
pub use search::{cosine_similarity, rank, RulesQuery, ScoredHit, DEFAULT_TOP_K};
pub use store::{Index, IndexEntry};

/// Result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
