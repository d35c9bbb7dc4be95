// Conversation module
// Chat messages and bounded per-session history

mod history;
mod message;

pub use history::ConversationHistory;
pub use message::{Message, Role};
