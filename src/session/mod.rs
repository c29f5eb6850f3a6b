//! Remote chat session abstraction for gemterm.
//!
//! [`ChatSession`] is the boundary to the hosted model: each call to
//! [`ChatSession::send`] returns a lazy [`FragmentStream`] of text deltas for
//! one model turn. [`GeminiSession`] implements it over rig-core's Gemini
//! provider; tests substitute scripted sessions.

mod gemini;
mod turn;

pub use gemini::{configure, GeminiSession};
pub use turn::track_turn;

use futures::stream::LocalBoxStream;

use crate::error::ChatError;

/// One incremental piece of a streamed reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub text: String,
}

impl Fragment {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A finite stream of fragments for a single turn.
///
/// The stream ends (`None`) after the last fragment, or immediately after
/// yielding its first `Err`.
pub type FragmentStream<'a> = LocalBoxStream<'a, Result<Fragment, ChatError>>;

/// A conversation with a remote model.
///
/// The session owns the conversation history. Callers only append to it by
/// sending new user turns; the returned stream borrows the session
/// mutably, so turns are strictly sequential.
pub trait ChatSession {
    /// Model identifier this session talks to.
    fn model(&self) -> &str;

    /// Sends `text` as the next user turn and streams the reply.
    ///
    /// Nothing goes over the network until the stream is first polled.
    fn send<'a>(&'a mut self, text: &str) -> FragmentStream<'a>;
}
