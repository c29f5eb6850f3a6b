//! Conversation types for gemterm.
//!
//! A [`Conversation`] is the ordered list of [`Message`] turns that the
//! session sends along with every request. It only grows by whole turns: a
//! user message together with the model reply that answered it.

use rig::message::Message as RigMessage;

/// The role of a message sender in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Model,
}

/// A single turn in a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub text: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }

    /// Converts to a rig-core message for the provider request.
    pub fn to_rig(&self) -> RigMessage {
        match self.role {
            Role::User => RigMessage::user(self.text.as_str()),
            Role::Model => RigMessage::assistant(self.text.as_str()),
        }
    }
}

/// Append-only conversation history.
#[derive(Debug, Default, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a completed exchange.
    pub fn push_exchange(&mut self, user: impl Into<String>, reply: impl Into<String>) {
        self.messages.push(Message::user(user));
        self.messages.push(Message::model(reply));
    }

    #[cfg(test)]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// History in rig-core form, oldest first.
    pub fn to_rig(&self) -> Vec<RigMessage> {
        self.messages.iter().map(Message::to_rig).collect()
    }
}
