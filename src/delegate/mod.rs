// Completion delegate
// Wraps an LLM provider with Oakbot's prompt and knowledge block

mod completion;
mod knowledge;

pub use completion::{CompletionDelegate, DelegateStatus};
pub use knowledge::{Knowledge, NORTHEASTERN_KNOWLEDGE};
