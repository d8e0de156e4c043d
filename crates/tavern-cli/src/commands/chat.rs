//! `tavern chat`: talk to an NPC.

use crate::input::{PipedInput, TerminalInput};
use crate::render;
use crate::repl::{Repl, ReplConfig};
use anyhow::Context;
use clap::Args;
use std::io::IsTerminal;
use std::sync::Arc;
use tavern_core::TavernConfig;
use tavern_dialogue::{CompletionProvider, NpcDirector, NpcProfile, OllamaCompletion};

/// Chat command arguments.
#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Completion model
    #[arg(short, long)]
    pub model: Option<String>,

    /// Ollama server URL
    #[arg(long)]
    pub ollama_url: Option<String>,

    /// NPC display name
    #[arg(long)]
    pub npc_name: Option<String>,

    /// NPC personality
    #[arg(long)]
    pub personality: Option<String>,

    /// Action the player performs each turn
    #[arg(long)]
    pub player_action: Option<String>,

    /// Extra context sent with every turn
    #[arg(long)]
    pub context: Option<String>,

    /// Sampling temperature (0.0 - 2.0)
    #[arg(short, long)]
    pub temperature: Option<f32>,

    /// Print the reply as it is generated
    #[arg(long)]
    pub stream: bool,

    /// Ask the model to answer in JSON mode
    #[arg(long)]
    pub json_format: bool,
}

impl ChatArgs {
    /// Layer the flags over the loaded configuration.
    pub fn apply(&self, config: &mut TavernConfig) {
        if let Some(model) = &self.model {
            config.ollama.completion_model = model.clone();
        }
        if let Some(url) = &self.ollama_url {
            config.ollama.base_url = url.clone();
        }
        if let Some(name) = &self.npc_name {
            config.npc.name = name.clone();
        }
        if let Some(personality) = &self.personality {
            config.npc.personality = personality.clone();
        }
        if let Some(action) = &self.player_action {
            config.npc.player_action = action.clone();
        }
        if let Some(context) = &self.context {
            config.npc.context = Some(context.clone());
        }
        if let Some(temperature) = self.temperature {
            config.npc.temperature = temperature;
        }
        if self.stream {
            config.npc.stream = true;
        }
        if self.json_format {
            config.npc.json_format = true;
        }
    }
}

/// Run the chat command.
pub async fn run(args: ChatArgs, mut config: TavernConfig) -> anyhow::Result<()> {
    args.apply(&mut config);
    config.validate().context("Invalid chat settings")?;

    let provider =
        OllamaCompletion::from_config(&config).context("Failed to create completion client")?;
    render::render_welcome(&config.npc.name, provider.model());

    let director = NpcDirector::new(Arc::new(provider)).with_temperature(config.npc.temperature);
    let npc = NpcProfile::from_config(&config.npc);
    let repl_config = ReplConfig {
        stream: config.npc.stream,
        debug: false,
        context: config.npc.context.clone(),
    };

    let mut repl = Repl::new(director, npc, repl_config);
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    if stdin.is_terminal() && stdout.is_terminal() {
        let history_file = tavern_core::paths::base_dir()
            .map(|dir| dir.join("history"))
            .ok();
        let mut input = TerminalInput::new(history_file).context("Failed to open terminal")?;
        repl.run(&mut input, &mut stdout).await
    } else {
        let mut input = PipedInput::new(stdin.lock());
        repl.run(&mut input, &mut stdout).await
    }
}
