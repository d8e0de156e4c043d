//! Parsing of model output into NPC dialogue.
//!
//! Models are asked for JSON but do not always comply. Parsing therefore never
//! fails: text that is not a dialogue object becomes a [`DialogueOutcome::RawFallback`].

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Note attached to responses that could not be read as JSON.
pub const FALLBACK_NOTE: &str = "Response not in JSON format";

/// Structured NPC reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueResponse {
    /// What the NPC says.
    pub dialogue: String,

    /// What the NPC does.
    #[serde(default)]
    pub actions: String,

    /// How the NPC feels.
    #[serde(default)]
    pub emotion: String,

    /// What the NPC decides to do next.
    #[serde(default)]
    pub decision: String,
}

/// Result of interpreting a completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DialogueOutcome {
    /// The model returned the requested JSON object.
    Structured(DialogueResponse),

    /// The model returned something else; its text is used as the dialogue.
    RawFallback {
        /// Text exactly as received.
        raw_response: String,
        /// Why the text was not parsed.
        note: String,
    },
}

impl DialogueOutcome {
    /// Line the NPC speaks.
    pub fn dialogue(&self) -> &str {
        match self {
            Self::Structured(response) => &response.dialogue,
            Self::RawFallback { raw_response, .. } => raw_response,
        }
    }

    /// Structured fields, if parsing succeeded.
    pub fn structured(&self) -> Option<&DialogueResponse> {
        match self {
            Self::Structured(response) => Some(response),
            Self::RawFallback { .. } => None,
        }
    }

    /// Whether this is a fallback.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::RawFallback { .. })
    }
}

/// Interpret completion text as an NPC reply.
pub fn parse_dialogue(text: &str) -> DialogueOutcome {
    let candidate = strip_code_fence(text.trim());

    match serde_json::from_str::<DialogueResponse>(candidate) {
        Ok(response) => DialogueOutcome::Structured(response),
        Err(e) => {
            debug!("Completion is not a dialogue object: {}", e);
            DialogueOutcome::RawFallback {
                raw_response: text.to_string(),
                note: FALLBACK_NOTE.to_string(),
            }
        }
    }
}

/// Remove a surrounding Markdown code fence, with or without a language tag.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return text;
    };

    // Drop the info string (e.g. `json`) on the opening line
    match body.find('\n') {
        Some(pos) => body[pos + 1..].trim(),
        None => body.trim(),
    }
}
