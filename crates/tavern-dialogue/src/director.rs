//! Turns player input into NPC replies.

use crate::prompt::{build_for_profile, NpcProfile};
use crate::providers::CompletionProvider;
use crate::response::{parse_dialogue, DialogueOutcome};
use crate::Result;
use futures::StreamExt;
use std::sync::Arc;
use tracing::debug;

/// Drives one NPC: builds the prompt, calls the model, parses the reply.
pub struct NpcDirector {
    provider: Arc<dyn CompletionProvider>,
    temperature: f32,
}

impl NpcDirector {
    /// Create a director with the default temperature (0.7).
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            provider,
            temperature: 0.7,
        }
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// The underlying provider.
    pub fn provider(&self) -> &dyn CompletionProvider {
        self.provider.as_ref()
    }

    /// Produce the NPC's reply to `situation`.
    pub async fn respond(
        &self,
        npc: &NpcProfile,
        situation: &str,
        context: Option<&str>,
    ) -> Result<DialogueOutcome> {
        let prompt = build_for_profile(npc, situation, context);
        debug!(npc = %npc.name, model = self.provider.model(), "Requesting completion");
        let completion = self.provider.complete(&prompt, self.temperature).await?;

        debug!(chars = completion.text.len(), "Completion received");
        Ok(parse_dialogue(&completion.text))
    }

    /// Like [`respond`](Self::respond), handing each fragment to `on_fragment`
    /// as it arrives and parsing the accumulated text at the end.
    ///
    /// An error mid-stream discards what was received so far.
    pub async fn respond_streaming<F>(
        &self,
        npc: &NpcProfile,
        situation: &str,
        context: Option<&str>,
        mut on_fragment: F,
    ) -> Result<DialogueOutcome>
    where
        F: FnMut(&str) + Send,
    {
        let prompt = build_for_profile(npc, situation, context);
        debug!(npc = %npc.name, model = self.provider.model(), "Requesting streamed completion");
        let mut stream = self.provider.complete_stream(&prompt, self.temperature);
        let mut text = String::new();

        while let Some(fragment) = stream.next().await {
            let fragment = fragment?;
            on_fragment(&fragment);
            text.push_str(&fragment);
        }

        debug!(chars = text.len(), "Stream finished");
        Ok(parse_dialogue(&text))
    }
}
