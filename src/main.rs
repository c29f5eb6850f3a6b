//! Entry point for gemterm, a terminal chat client for Google Gemini.
//!
//! This binary loads environment variables, parses CLI arguments via [`cli`],
//! sets up logging, and runs the chat session. Startup failures exit with
//! status 1; every user-driven exit is status 0.

mod chat;
mod cli;
mod config;
mod constants;
mod credential;
mod error;
mod format;
mod input;
mod logging;
mod message;
mod output;
mod session;

use colored::Colorize;
use std::process::ExitCode;

/// Runs the gemterm CLI.
///
/// Loads `.env` files (silently ignored if absent) so `GEMINI_API_KEY` can
/// live there, then dispatches to [`cli::run`].
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = cli::parse();
    logging::init(cli.verbose);

    match cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "startup failed");
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
