//! Command-line interface definition and startup sequence for gemterm.
//!
//! Uses [`clap`] for argument parsing with derive macros. [`run`] performs
//! the startup steps (banner, credential, client, session) and then hands
//! over to the chat loop.

use anyhow::Result;
use clap::{ArgAction, Parser};
use colored::Colorize;
use std::io::Write;

use crate::chat;
use crate::config::Config;
use crate::constants::DEFAULT_MODEL;
use crate::credential::{self, CredentialOutcome};
use crate::input::Readline;
use crate::output::{self, TerminalRenderer};
use crate::session::{self, ChatSession, GeminiSession};

/// Top-level CLI structure for gemterm.
///
/// The API key is deliberately not a flag; it comes from `GEMINI_API_KEY`
/// or the interactive prompt.
#[derive(Parser, Debug)]
#[command(name = "gemterm", version, about = "Chat with Google Gemini in the terminal")]
pub struct Cli {
    /// Model to chat with
    #[arg(short, long, env = "GEMTERM_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// System prompt sent with every turn
    #[arg(long, env = "GEMTERM_SYSTEM_PROMPT")]
    pub system_prompt: Option<String>,

    /// Don't clear the screen at startup
    #[arg(long)]
    pub no_clear: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Parses command-line arguments into a [`Cli`] struct.
///
/// Delegates to [`clap::Parser::parse`], which exits the process on invalid input.
pub fn parse() -> Cli {
    Cli::parse()
}

/// Runs gemterm: banner, credential, session, then the chat loop.
///
/// Returns `Ok(())` for every user-driven exit, including an interrupted
/// key prompt.
///
/// # Errors
///
/// Startup failures ([`crate::error::StartupError`]) and line editor errors.
pub async fn run(cli: Cli) -> Result<()> {
    let config = Config::from(cli);
    let mut renderer = TerminalRenderer::stdout();

    if config.clear_screen && renderer.is_interactive() {
        output::clear_screen(renderer.writer())?;
    }
    output::print_banner(renderer.writer())?;

    let mut input = Readline::new()?;
    let credential =
        match credential::acquire(credential::from_env(), &mut input, renderer.writer())? {
            CredentialOutcome::Ready(credential, source) => {
                tracing::info!(?source, "using API key");
                credential
            }
            CredentialOutcome::Aborted => {
                writeln!(renderer.writer(), "\n{}", "Exiting...".red().bold())?;
                return Ok(());
            }
        };

    let client = session::configure(&credential)?;
    let mut session = GeminiSession::open(client, &config.model, config.system_prompt)?;
    output::print_ready(renderer.writer(), session.model())?;

    chat::run_chat(&mut session, &mut input, &mut renderer, chat::ctrl_c).await
}
