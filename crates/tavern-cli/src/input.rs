//! Player input sources for the dialogue loop.
//!
//! A terminal gets rustyline line editing and history; piped input and tests
//! read plain lines from any `BufRead`.

use rustyline::error::ReadlineError;
use rustyline::{Config, DefaultEditor, EditMode};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::debug;

/// Result of asking for one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadLine {
    /// A line without its line ending, otherwise untouched.
    Line(String),
    /// Ctrl-C at the prompt.
    Interrupted,
    /// End of input (Ctrl-D or a closed pipe).
    Eof,
}

/// Where the dialogue loop reads player input from.
pub trait LineSource {
    /// Show `prompt` and read the next line.
    fn read_line<W: Write>(&mut self, prompt: &str, out: &mut W) -> anyhow::Result<ReadLine>;
}

/// Plain line reader for pipes, files, and tests.
///
/// The prompt is written to the loop's output.
pub struct PipedInput<R> {
    reader: R,
    buf: String,
}

impl<R: BufRead> PipedInput<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
        }
    }
}

impl<R: BufRead> LineSource for PipedInput<R> {
    fn read_line<W: Write>(&mut self, prompt: &str, out: &mut W) -> anyhow::Result<ReadLine> {
        write!(out, "{}", prompt)?;
        out.flush()?;

        self.buf.clear();
        if self.reader.read_line(&mut self.buf)? == 0 {
            return Ok(ReadLine::Eof);
        }
        let line = self.buf.trim_end_matches(|c| c == '\n' || c == '\r');
        Ok(ReadLine::Line(line.to_string()))
    }
}

/// Interactive terminal input with line editing and persistent history.
pub struct TerminalInput {
    editor: DefaultEditor,
    history_file: Option<PathBuf>,
}

impl TerminalInput {
    /// Create an editor, loading history from `history_file` if it exists.
    pub fn new(history_file: Option<PathBuf>) -> anyhow::Result<Self> {
        let config = Config::builder()
            .history_ignore_space(true)
            .edit_mode(EditMode::Emacs)
            .build();

        let mut editor = DefaultEditor::with_config(config)?;
        if let Some(path) = &history_file {
            // Missing on first run
            let _ = editor.load_history(path);
        }

        Ok(Self {
            editor,
            history_file,
        })
    }
}

impl LineSource for TerminalInput {
    fn read_line<W: Write>(&mut self, prompt: &str, _out: &mut W) -> anyhow::Result<ReadLine> {
        let styled = console::style(prompt).green().bold().to_string();
        match self.editor.readline(&styled) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(ReadLine::Line(line))
            }
            Err(ReadlineError::Interrupted) => Ok(ReadLine::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadLine::Eof),
            Err(err) => Err(err.into()),
        }
    }
}

impl Drop for TerminalInput {
    fn drop(&mut self) {
        let Some(path) = &self.history_file else {
            return;
        };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Err(e) = self.editor.save_history(path) {
            debug!("Could not save history to {}: {}", path.display(), e);
        }
    }
}
