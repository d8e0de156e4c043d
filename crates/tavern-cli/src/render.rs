//! Terminal rendering utilities.
//!
//! Banners and hints go to stderr; anything a script might consume is written
//! to the caller's writer.

use console::style;
use std::io::{self, Write};
use std::time::Duration;
use tavern_dialogue::DialogueOutcome;
use tavern_rag::ScoredHit;

/// Print the welcome banner for the dialogue loop.
pub fn render_welcome(npc: &str, model: &str) {
    eprintln!(
        "{} {} {}",
        style("tavern").bold().cyan(),
        style(format!("talking to {}", npc)).dim(),
        style(format!("({})", model)).dim(),
    );
    eprintln!("{}", style("Type help for commands, quit to exit.").dim());
    eprintln!();
}

/// Print the help message.
pub fn render_help<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "Type quit to exit the program")?;
    writeln!(out, "  {}  - Show this help", style("help").cyan())?;
    writeln!(out, "  {} - Toggle response details and timing", style("debug").cyan())?;
    writeln!(out, "  {}  - Exit", style("quit").cyan())?;
    Ok(())
}

/// Print the parts of a reply that are hidden outside debug mode.
pub fn render_details<W: Write>(
    out: &mut W,
    outcome: &DialogueOutcome,
    elapsed: Duration,
) -> io::Result<()> {
    match outcome {
        DialogueOutcome::Structured(response) => {
            writeln!(out, "  {} {}", style("actions:").dim(), response.actions)?;
            writeln!(out, "  {} {}", style("emotion:").dim(), response.emotion)?;
            writeln!(out, "  {} {}", style("decision:").dim(), response.decision)?;
        }
        DialogueOutcome::RawFallback { note, .. } => {
            writeln!(out, "  {} {}", style("note:").yellow(), note)?;
        }
    }
    writeln!(out, "  {} {:.2}s", style("time:").dim(), elapsed.as_secs_f64())
}

/// Print ranked hits, one per line.
pub fn render_hits<W: Write>(out: &mut W, hits: &[ScoredHit]) -> io::Result<()> {
    writeln!(out, "Top results:")?;
    for (i, hit) in hits.iter().enumerate() {
        writeln!(
            out,
            "{}. score={:.3} | {} :: {}",
            i + 1,
            hit.score,
            hit.entry.id,
            hit.entry.text
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tavern_dialogue::{parse_dialogue, DialogueResponse};
    use tavern_rag::IndexEntry;

    fn hit(id: &str, text: &str, score: f32) -> ScoredHit {
        ScoredHit {
            entry: IndexEntry {
                id: id.into(),
                text: text.into(),
                metadata: Default::default(),
                embedding: vec![1.0],
            },
            score,
        }
    }

    #[test]
    fn test_render_hits() {
        let mut out = Vec::new();
        render_hits(
            &mut out,
            &[
                hit("safety.refuse.1", "Refuse policy 1: poison", 0.91234),
                hit("rules.R1", "Rule R1: no credit", 0.5),
            ],
        )
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Top results:\n1. score=0.912 | safety.refuse.1 :: Refuse policy 1: poison\n2. score=0.500 | rules.R1 :: Rule R1: no credit\n"
        );
    }

    #[test]
    fn test_render_details_structured() {
        let outcome = DialogueOutcome::Structured(DialogueResponse {
            dialogue: "Hi".into(),
            actions: "waves".into(),
            emotion: "happy".into(),
            decision: "greet".into(),
        });

        let mut out = Vec::new();
        render_details(&mut out, &outcome, Duration::from_millis(1500)).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("waves"));
        assert!(text.contains("happy"));
        assert!(text.contains("greet"));
        assert!(text.contains("1.50s"));
    }

    #[test]
    fn test_render_details_fallback() {
        let mut out = Vec::new();
        render_details(&mut out, &parse_dialogue("grunts"), Duration::ZERO).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Response not in JSON format"));
    }
}
