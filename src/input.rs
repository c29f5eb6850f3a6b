//! Line input for the chat REPL and the credential prompt.
//!
//! [`LineSource`] hides the line editor behind a small trait so the loop can
//! be driven by [`Readline`] in production and by canned input in tests.

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Result of asking the user for one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A line was entered (without the trailing newline).
    Line(String),
    /// Ctrl+C at the prompt.
    Interrupted,
    /// Ctrl+D / end of input.
    Eof,
}

/// Something that can prompt for and return a line of text.
pub trait LineSource {
    /// Shows `prompt` and blocks until a line, an interrupt, or EOF arrives.
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome>;

    /// Makes `line` available for up/down recall. Never written to disk.
    fn remember(&mut self, _line: &str) {}
}

/// [`LineSource`] backed by rustyline with in-memory history.
pub struct Readline {
    editor: DefaultEditor,
}

impl Readline {
    pub fn new() -> Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl LineSource for Readline {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(ReadOutcome::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(ReadOutcome::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadOutcome::Eof),
            Err(e) => Err(e.into()),
        }
    }

    fn remember(&mut self, line: &str) {
        let _ = self.editor.add_history_entry(line);
    }
}
