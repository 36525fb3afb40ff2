use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::llm::TextGenerator;

/// Shown in place of a reply when the request fails.
pub const CHAT_ERROR_MESSAGE: &str = "Error: Unable to get a response.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub text: String,
    pub sender: Sender,
}

/// Conversation state of the chat panel.
///
/// `send` borrows the session mutably, so a session has at most one request
/// in flight.
#[derive(Debug, Default)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Send a user message and append the bot's reply.
    ///
    /// Blank input is ignored and returns `None`. Each message goes to the
    /// generator as-is, without earlier turns.
    pub async fn send(&mut self, generator: &dyn TextGenerator, text: &str) -> Option<&ChatMessage> {
        if text.trim().is_empty() {
            return None;
        }

        self.messages.push(ChatMessage {
            text: text.to_string(),
            sender: Sender::User,
        });

        let reply = match generator.generate(text).await {
            Ok(reply) => {
                info!(reply_length = reply.len(), "chat reply received");
                reply
            }
            Err(e) => {
                warn!(error = %e, "chat request failed");
                CHAT_ERROR_MESSAGE.to_string()
            }
        };

        self.messages.push(ChatMessage {
            text: reply,
            sender: Sender::Bot,
        });
        self.messages.last()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoachError;
    use crate::llm::MockTextGenerator;

    #[test]
    fn test_send_appends_both_turns() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .times(1)
            .returning(|_| Ok("Try 3 sets of 10 squats.".to_string()));

        let mut session = ChatSession::new();
        let reply = tokio_test::block_on(session.send(&generator, "How do I build legs?"))
            .cloned()
            .unwrap();
        assert_eq!(reply.sender, Sender::Bot);
        assert_eq!(reply.text, "Try 3 sets of 10 squats.");

        let messages = session.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].sender, Sender::User);
        assert_eq!(messages[0].text, "How do I build legs?");
    }

    #[test]
    fn test_blank_message_ignored() {
        let mut generator = MockTextGenerator::new();
        generator.expect_generate().times(0);

        let mut session = ChatSession::new();
        assert!(tokio_test::block_on(session.send(&generator, "   ")).is_none());
        assert!(session.messages().is_empty());
    }

    #[test]
    fn test_failure_becomes_error_reply() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .returning(|_| Err(CoachError::Generation("timeout".into())));

        let mut session = ChatSession::new();
        let reply = tokio_test::block_on(session.send(&generator, "hello"))
            .cloned()
            .unwrap();
        assert_eq!(reply.text, CHAT_ERROR_MESSAGE);
        assert_eq!(session.messages().len(), 2);

        session.clear();
        assert!(session.messages().is_empty());
    }

    #[test]
    fn test_message_serialization() {
        let msg = ChatMessage {
            text: "hi".into(),
            sender: Sender::User,
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"text":"hi","sender":"user"}"#);
    }
}
