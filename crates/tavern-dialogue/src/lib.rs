//! NPC dialogue generation for tavern.
//!
//! This crate provides:
//! - The Dungeon Master prompt for a single NPC turn
//! - Completion providers (Ollama), streaming and non-streaming
//! - Lenient parsing of model output into structured dialogue
//! - [`NpcDirector`], which ties the three together

pub mod director;
pub mod error;
pub mod prompt;
pub mod providers;
pub mod response;

pub use director::NpcDirector;
pub use error::CompletionError;
pub use prompt::{build_for_profile, build_npc_prompt, NpcProfile};
pub use providers::{CompletionProvider, FragmentStream, OllamaCompletion, RawCompletion};
pub use response::{parse_dialogue, DialogueOutcome, DialogueResponse, FALLBACK_NOTE};

/// Result type for dialogue operations.
pub type Result<T> = std::result::Result<T, CompletionError>;
