//! Conversation

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    /// The support assistant
    Bot,

    /// The customer
    User,
}

/// One message in the support chat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message author
    pub author: Author,

    /// Message body
    pub text: String,

    /// When the message was appended
    pub sent_at: Timestamp,
}

/// Which panel of the chat widget is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChatView {
    /// The message history and input box
    #[default]
    Conversation,

    /// The support ticket form
    TicketForm,
}

/// Append-only message history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    /// Start a conversation with a bot greeting.
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        let mut conversation = Self::default();
        conversation.push(Author::Bot, greeting);
        conversation
    }

    /// Append a message from the customer.
    pub fn push_user(&mut self, text: impl Into<String>) {
        self.push(Author::User, text);
    }

    /// Append a message from the assistant.
    pub fn push_bot(&mut self, text: impl Into<String>) {
        self.push(Author::Bot, text);
    }

    /// Messages in the order they were appended.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Most recent message.
    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether nothing has been said yet.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn push(&mut self, author: Author, text: impl Into<String>) {
        self.messages.push(ChatMessage {
            author,
            text: text.into(),
            sent_at: Timestamp::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_is_first_bot_message() {
        let conversation = Conversation::with_greeting("Hi!");

        assert_eq!(conversation.len(), 1);
        assert_eq!(conversation.last().map(|m| m.author), Some(Author::Bot));
        assert_eq!(conversation.last().map(|m| m.text.as_str()), Some("Hi!"));
    }

    #[test]
    fn messages_keep_append_order() {
        let mut conversation = Conversation::default();

        conversation.push_user("where is my order");
        conversation.push_bot("Check the orders page.");
        conversation.push_user("thanks");

        let authors: Vec<Author> = conversation.messages().iter().map(|m| m.author).collect();

        assert_eq!(authors, [Author::User, Author::Bot, Author::User]);
    }

    #[test]
    fn timestamps_do_not_go_backwards() {
        let mut conversation = Conversation::default();

        conversation.push_user("one");
        conversation.push_user("two");

        let times: Vec<Timestamp> = conversation.messages().iter().map(|m| m.sent_at).collect();

        assert!(times.is_sorted(), "timestamps out of order: {times:?}");
    }

    #[test]
    fn default_view_is_conversation() {
        assert_eq!(ChatView::default(), ChatView::Conversation);
    }
}
