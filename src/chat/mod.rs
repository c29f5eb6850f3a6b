//! Interactive chat REPL for gemterm.
//!
//! Reads one line at a time, forwards it to the [`ChatSession`], and streams
//! the reply through a [`Renderer`]. The session keeps the conversation
//! history; this module only ever appends to it by sending new turns.
//!
//! # Readline behavior
//!
//! - **exit** / **quit** (any case): prints "Goodbye!" and returns
//! - **Ctrl+C** or **Ctrl+D** at the prompt: same as `exit`
//! - **Ctrl+C** while a reply is streaming: clears the reply and exits
//! - blank lines are ignored


use anyhow::Result;
use colored::Colorize;
use futures::StreamExt;
use std::future::Future;
use tokio::time::{self, MissedTickBehavior};

use crate::constants::{EXIT_COMMANDS, REFRESH_INTERVAL, USER_LABEL};
use crate::error::ChatError;
use crate::input::{LineSource, ReadOutcome};
use crate::output::Renderer;
use crate::session::ChatSession;

/// What to do with one line of user input.
#[derive(Debug, PartialEq, Eq)]
pub enum Command<'a> {
    /// Blank input; prompt again.
    Skip,
    /// `exit` or `quit`.
    Exit,
    /// Send the (trimmed) text as a chat turn.
    Send(&'a str),
}

/// Classifies a raw input line.
pub fn classify(line: &str) -> Command<'_> {
    let line = line.trim();
    if line.is_empty() {
        Command::Skip
    } else if EXIT_COMMANDS.iter().any(|cmd| line.eq_ignore_ascii_case(cmd)) {
        Command::Exit
    } else {
        Command::Send(line)
    }
}

/// How a single turn ended.
#[derive(Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The stream was exhausted; holds the full reply.
    Completed(String),
    /// The stream yielded an error; the partial reply was discarded.
    Failed(ChatError),
    /// The user interrupted while waiting or streaming.
    Interrupted,
}

/// Runs the interactive chat loop until the user exits.
///
/// `interrupt` is called once per turn; the turn is abandoned when the
/// returned future resolves. Per-turn failures are reported through the
/// renderer and the loop continues.
///
/// # Errors
///
/// Only line editor failures end the loop with an error.
pub async fn run_chat<F, Fut>(
    session: &mut dyn ChatSession,
    input: &mut dyn LineSource,
    renderer: &mut dyn Renderer,
    mut interrupt: F,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    let prompt = format!("{}: ", USER_LABEL.green().bold());

    loop {
        let line = match input.read_line(&prompt)? {
            ReadOutcome::Line(line) => line,
            ReadOutcome::Interrupted | ReadOutcome::Eof => {
                renderer.farewell();
                break;
            }
        };

        let text = match classify(&line) {
            Command::Skip => continue,
            Command::Exit => {
                renderer.farewell();
                break;
            }
            Command::Send(text) => text,
        };
        input.remember(text);

        match drive_turn(session, renderer, text, interrupt()).await {
            TurnOutcome::Completed(reply) => {
                tracing::debug!(bytes = reply.len(), "turn completed");
            }
            TurnOutcome::Failed(err) => {
                tracing::debug!(error = %err, "turn dropped");
            }
            TurnOutcome::Interrupted => {
                tracing::info!("interrupted while streaming");
                renderer.farewell();
                break;
            }
        }
    }

    Ok(())
}

/// Sends `text` and renders the streamed reply until it ends.
///
/// While waiting, the renderer is ticked every [`REFRESH_INTERVAL`] so the
/// spinner animates and throttled updates get flushed.
pub async fn drive_turn(
    session: &mut dyn ChatSession,
    renderer: &mut dyn Renderer,
    text: &str,
    interrupt: impl Future<Output = ()>,
) -> TurnOutcome {
    renderer.begin_turn();

    let mut stream = session.send(text);
    let mut ticker = time::interval(REFRESH_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately.
    ticker.tick().await;
    tokio::pin!(interrupt);

    let mut reply = String::new();
    loop {
        tokio::select! {
            biased;
            _ = &mut interrupt => {
                renderer.abort();
                return TurnOutcome::Interrupted;
            }
            next = stream.next() => match next {
                Some(Ok(fragment)) => {
                    reply.push_str(&fragment.text);
                    renderer.update(&reply);
                }
                Some(Err(err)) => {
                    renderer.fail(&err);
                    return TurnOutcome::Failed(err);
                }
                None => break,
            },
            _ = ticker.tick() => renderer.tick(),
        }
    }

    renderer.finish(&reply);
    TurnOutcome::Completed(reply)
}

/// Resolves on the first Ctrl+C delivered as a signal.
///
/// If the handler can't be installed the future never resolves, so turns
/// are not cut short.
pub async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl+C");
        futures::future::pending::<()>().await;
    }
}
