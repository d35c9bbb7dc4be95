// Conversation history for multi-turn interactions

use super::Message;

const DEFAULT_MAX_MESSAGES: usize = 20;

/// Ordered (user, assistant) turns for one session, trimmed from the front
/// once `max_messages` is exceeded
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    messages: Vec<Message>,
    max_messages: usize,
}

impl ConversationHistory {
    /// Create a new conversation history with the default limit
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_MAX_MESSAGES)
    }

    /// Create a conversation history keeping at most `max_messages` messages
    pub fn with_limit(max_messages: usize) -> Self {
        Self {
            messages: Vec::new(),
            max_messages: max_messages.max(2),
        }
    }

    /// Record one completed exchange
    pub fn add_turn(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.messages.push(Message::user(user));
        self.messages.push(Message::assistant(assistant));
        self.trim_if_needed();
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of complete (user + assistant) turns
    pub fn turn_count(&self) -> usize {
        self.messages.len() / 2
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    fn trim_if_needed(&mut self) {
        if self.messages.len() > self.max_messages {
            // Drop whole turns so the history always starts with a user message
            let mut remove_count = self.messages.len() - self.max_messages;
            remove_count += remove_count % 2;
            self.messages.drain(0..remove_count.min(self.messages.len()));
        }
    }
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new()
    }
}
