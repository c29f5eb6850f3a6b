//! Gemini-backed [`ChatSession`] built on rig-core.
//!
//! rig-core is stateless, so the session keeps the [`Conversation`] itself
//! and sends it as chat history with every turn. Agents are constructed per
//! turn since they are cheap to create.

use futures::stream::{self, StreamExt};
use rig::agent::MultiTurnStreamItem;
use rig::client::CompletionClient;
use rig::message::Text;
use rig::providers::gemini;
use rig::streaming::{StreamedAssistantContent, StreamingChat};

use super::{track_turn, ChatSession, Fragment, FragmentStream};
use crate::credential::Credential;
use crate::error::{ChatError, StartupError};
use crate::message::Conversation;

/// A chat session with one Gemini model.
pub struct GeminiSession {
    client: gemini::Client,
    model: String,
    preamble: Option<String>,
    history: Conversation,
}

/// Builds a Gemini client handle from the credential.
///
/// # Errors
///
/// Returns [`StartupError::Configure`] if the client rejects the key.
pub fn configure(credential: &Credential) -> Result<gemini::Client, StartupError> {
    gemini::Client::new(credential.expose()).map_err(|e| StartupError::Configure(e.to_string()))
}

impl GeminiSession {
    /// Opens a session with an empty history.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError::ModelInit`] for an empty model name or one
    /// containing whitespace.
    pub fn open(
        client: gemini::Client,
        model: &str,
        preamble: Option<String>,
    ) -> Result<Self, StartupError> {
        let model = model.trim();
        if model.is_empty() {
            return Err(StartupError::ModelInit("model name is empty".into()));
        }
        if model.chars().any(char::is_whitespace) {
            return Err(StartupError::ModelInit(format!(
                "invalid model name '{model}'"
            )));
        }
        tracing::info!(model, "session opened");
        Ok(Self {
            client,
            model: model.to_string(),
            preamble: preamble.filter(|p| !p.trim().is_empty()),
            history: Conversation::new(),
        })
    }
}

impl ChatSession for GeminiSession {
    fn model(&self) -> &str {
        &self.model
    }

    fn send<'a>(&'a mut self, text: &str) -> FragmentStream<'a> {
        let agent = if let Some(ref sys) = self.preamble {
            self.client.agent(&self.model).preamble(sys).build()
        } else {
            self.client.agent(&self.model).build()
        };
        let prompt = text.to_string();
        let chat_history = self.history.to_rig();
        tracing::info!(
            chars = prompt.chars().count(),
            history = self.history.len(),
            "sending turn"
        );

        let request = prompt.clone();
        let inner = stream::once(async move { agent.stream_chat(request, chat_history).await })
            .flatten()
            .filter_map(|item| async move {
                match item {
                    Ok(MultiTurnStreamItem::StreamAssistantItem(StreamedAssistantContent::Text(
                        Text { text },
                    ))) => Some(Ok(Fragment::new(text))),
                    Err(err) => Some(Err(ChatError::Stream(err.to_string()))),
                    // Reasoning, final response, etc.
                    _ => None,
                }
            })
            .boxed_local();

        track_turn(&mut self.history, prompt, inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> gemini::Client {
        let credential = Credential::new("sk-test").unwrap();
        configure(&credential).unwrap()
    }

    #[test]
    fn test_open_default_model() {
        let session = GeminiSession::open(client(), "gemini-2.5-flash", None).unwrap();
        assert_eq!(session.model(), "gemini-2.5-flash");
        assert!(session.history.is_empty());
    }

    #[test]
    fn test_open_rejects_bad_model_names() {
        assert!(matches!(
            GeminiSession::open(client(), "  ", None),
            Err(StartupError::ModelInit(_))
        ));
        assert!(matches!(
            GeminiSession::open(client(), "gemini 2.5", None),
            Err(StartupError::ModelInit(_))
        ));
    }

    #[test]
    fn test_blank_preamble_is_dropped() {
        let session =
            GeminiSession::open(client(), "gemini-2.5-flash", Some("   ".into())).unwrap();
        assert!(session.preamble.is_none());
    }
}
