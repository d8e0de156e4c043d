//! Interactive dialogue loop.
//!
//! Provides `tavern chat`: every line the player types is sent to the NPC as
//! the current situation and the NPC's dialogue is printed back. Input comes
//! from a [`LineSource`] and output goes to any writer, so the loop can be
//! driven from tests.

use crate::input::{LineSource, ReadLine};
use crate::render;
use std::io::Write;
use std::time::Instant;
use tavern_dialogue::{NpcDirector, NpcProfile};
use tracing::warn;

/// Dialogue loop configuration.
#[derive(Debug, Clone, Default)]
pub struct ReplConfig {
    /// Print fragments as they arrive.
    pub stream: bool,
    /// Start with debug output enabled.
    pub debug: bool,
    /// Extra context sent with every turn.
    pub context: Option<String>,
}

/// Outcome of handling a loop command.
enum CommandResult {
    Continue,
    Quit,
    NotACommand,
}

/// The interactive dialogue loop.
pub struct Repl {
    director: NpcDirector,
    npc: NpcProfile,
    config: ReplConfig,
}

impl Repl {
    /// Create a new loop for one NPC.
    pub fn new(director: NpcDirector, npc: NpcProfile, config: ReplConfig) -> Self {
        Self {
            director,
            npc,
            config,
        }
    }

    /// Whether debug output is on.
    pub fn debug(&self) -> bool {
        self.config.debug
    }

    /// Run until `quit` or end of input.
    pub async fn run<S, W>(&mut self, input: &mut S, out: &mut W) -> anyhow::Result<()>
    where
        S: LineSource,
        W: Write + Send,
    {
        loop {
            let text = match input.read_line("> ", out)? {
                ReadLine::Line(line) => line,
                ReadLine::Interrupted => {
                    eprintln!("{}", console::style("^C (type quit to exit)").dim());
                    continue;
                }
                ReadLine::Eof => {
                    // End of input: leave without a farewell
                    writeln!(out)?;
                    break;
                }
            };

            match self.handle_command(&text, out)? {
                CommandResult::Continue => continue,
                CommandResult::Quit => break,
                CommandResult::NotACommand => {}
            }

            self.respond(&text, out).await?;
        }

        Ok(())
    }

    /// Handle a loop command. Commands are exact and case-sensitive.
    fn handle_command<W: Write>(&mut self, text: &str, out: &mut W) -> anyhow::Result<CommandResult> {
        match text {
            "quit" => {
                writeln!(out, "Goodbye {}", text)?;
                Ok(CommandResult::Quit)
            }
            "help" => {
                render::render_help(out)?;
                Ok(CommandResult::Continue)
            }
            "debug" => {
                self.config.debug = !self.config.debug;
                let state = if self.config.debug { "on" } else { "off" };
                writeln!(out, "Debug output {}", state)?;
                Ok(CommandResult::Continue)
            }
            _ => Ok(CommandResult::NotACommand),
        }
    }

    /// Send one line of player input and print the NPC's reply.
    async fn respond<W: Write + Send>(&self, situation: &str, out: &mut W) -> anyhow::Result<()> {
        let started = Instant::now();
        let context = self.config.context.as_deref();

        let result = if self.config.stream {
            let streamed = self
                .director
                .respond_streaming(&self.npc, situation, context, |fragment| {
                    // Display only; a failed write must not abort the turn
                    let _ = write!(out, "{}", fragment);
                    let _ = out.flush();
                })
                .await;
            writeln!(out)?;
            streamed
        } else {
            self.director.respond(&self.npc, situation, context).await
        };

        match result {
            Ok(outcome) => {
                writeln!(out, "{}", outcome.dialogue())?;
                if self.config.debug {
                    render::render_details(out, &outcome, started.elapsed())?;
                }
            }
            Err(e) => {
                warn!("Completion failed: {}", e);
                writeln!(
                    out,
                    "{} doesn't respond. (service unavailable: {})",
                    self.npc.name,
                    e.user_message()
                )?;
            }
        }

        Ok(())
    }
}
