//! Dungeon Master prompt for a single NPC turn.

use serde::{Deserialize, Serialize};
use tavern_core::NpcConfig;

/// Who the NPC is and what the player is doing to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcProfile {
    /// Display name.
    pub name: String,

    /// Short personality description.
    pub personality: String,

    /// Action the player takes on every turn (e.g. `talk`).
    pub player_action: String,
}

impl NpcProfile {
    /// Create a profile.
    pub fn new(
        name: impl Into<String>,
        personality: impl Into<String>,
        player_action: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            personality: personality.into(),
            player_action: player_action.into(),
        }
    }

    /// Take the profile fields from the NPC section of the config.
    pub fn from_config(config: &NpcConfig) -> Self {
        Self::new(&config.name, &config.personality, &config.player_action)
    }
}

impl Default for NpcProfile {
    fn default() -> Self {
        Self::from_config(&NpcConfig::default())
    }
}

const RESPONSE_INSTRUCTIONS: &str = "\n\nGenerate a response for this NPC. Include:
1. The NPC's spoken dialogue (in quotes)
2. The NPC's actions or body language (in italics or brackets)
3. Their emotional state
4. Any decisions they make

Keep the response concise and in-character. Format your response as JSON with these fields:
- dialogue: what the NPC says
- actions: what the NPC does
- emotion: how the NPC feels
- decision: what the NPC decides to do next
";

/// Build the completion prompt for one player turn.
///
/// `context` is appended as `Additional Context:` only when it is non-empty.
pub fn build_npc_prompt(
    npc_name: &str,
    personality: &str,
    situation: &str,
    player_action: &str,
    context: Option<&str>,
) -> String {
    let mut prompt = format!(
        "You are a Dungeon Master assistant for a tabletop RPG game.\n\n\
         NPC Information:\n\
         - Name: {}\n\
         - Personality: {}\n\n\
         Current Situation: {}\n\n\
         Player Action: {}\n",
        npc_name, personality, situation, player_action
    );

    if let Some(ctx) = context.filter(|c| !c.is_empty()) {
        prompt.push_str("\nAdditional Context: ");
        prompt.push_str(ctx);
    }

    prompt.push_str(RESPONSE_INSTRUCTIONS);
    prompt
}

/// [`build_npc_prompt`] for a profile.
pub fn build_for_profile(profile: &NpcProfile, situation: &str, context: Option<&str>) -> String {
    build_npc_prompt(
        &profile.name,
        &profile.personality,
        situation,
        &profile.player_action,
        context,
    )
}
