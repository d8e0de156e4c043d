//! Grounding prompt assembled from retrieved rules.

use crate::search::ScoredHit;

/// Build the roleplay prompt for `npc_name` from the retrieved hits.
pub fn compose_prompt(npc_name: &str, query: &str, hits: &[ScoredHit]) -> String {
    let rules_block = hits
        .iter()
        .map(|hit| format!("- {}", hit.entry.text))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are roleplaying NPC {npc}, a bartender. Use the following retrieved rules and persona snippets to guide your response.\n\
Rules and persona context (top-{count}):\n\
{rules}\n\
\n\
Player input: {query}\n\
\n\
Respond in JSON with fields: dialogue, actions, emotion, decision. Keep it concise and in-character.",
        npc = npc_name,
        count = hits.len(),
        rules = rules_block,
        query = query,
    )
}
