//! API key acquisition.
//!
//! The key comes from `GEMINI_API_KEY` (the environment or a `.env` file
//! loaded at startup) or, failing that, from an interactive prompt. It only
//! ever lives in memory.

use anyhow::Result;
use colored::Colorize;
use std::fmt;
use std::io::Write;

use crate::constants::{API_KEY_ENV, API_KEY_PROMPT, API_KEY_URL};
use crate::error::StartupError;
use crate::input::{LineSource, ReadOutcome};

/// A non-empty API key. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Returns `None` for empty or whitespace-only keys.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            None
        } else {
            Some(Self(key))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Where the key came from. Logged instead of the key itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Env,
    Prompt,
}

/// Outcome of [`acquire`].
#[derive(Debug)]
pub enum CredentialOutcome {
    Ready(Credential, CredentialSource),
    /// The user interrupted the prompt; exit quietly with status 0.
    Aborted,
}

/// Reads the key from the current process environment.
pub fn from_env() -> Option<String> {
    std::env::var(API_KEY_ENV).ok()
}

/// Resolves the API key, prompting on `input` when `env_value` is unusable.
///
/// # Errors
///
/// Fails with an error that downcasts to [`StartupError::MissingCredential`]
/// if the prompt yields an empty key, or with the prompt's own I/O error.
pub fn acquire(
    env_value: Option<String>,
    input: &mut dyn LineSource,
    out: &mut impl Write,
) -> Result<CredentialOutcome> {
    if let Some(credential) = env_value.and_then(Credential::new) {
        return Ok(CredentialOutcome::Ready(credential, CredentialSource::Env));
    }

    writeln!(
        out,
        "{}",
        format!("{API_KEY_ENV} not found in environment variables.").red().bold()
    )?;
    writeln!(out, "Please enter your Gemini API key below.")?;
    writeln!(out, "You can get one from: {}", API_KEY_URL.underline())?;
    out.flush()?;

    let prompt = format!("{}: ", API_KEY_PROMPT.yellow().bold());
    let entered = match input.read_line(&prompt)? {
        ReadOutcome::Line(line) => line,
        ReadOutcome::Interrupted | ReadOutcome::Eof => return Ok(CredentialOutcome::Aborted),
    };

    match Credential::new(entered) {
        Some(credential) => Ok(CredentialOutcome::Ready(credential, CredentialSource::Prompt)),
        None => Err(StartupError::MissingCredential.into()),
    }
}
