// Static knowledge context and system prompt

use crate::conversation::Message;

/// Facts embedded in every completion prompt
pub const NORTHEASTERN_KNOWLEDGE: &str = "\
Northeastern University Information:
- Founded in 1898 in Boston, Massachusetts
- Known for cooperative education (co-op) program
- Offers undergraduate and graduate programs
- Campus locations in Boston, Charlotte, London, Toronto, Vancouver, and more
- Mascot: King Husky
- Colors: Red and Black
- Popular programs: Engineering, Business, Computer Science, Health Sciences";

const PERSONA: &str = "You are Oakbot, a helpful assistant for Northeastern University \
students with access to the following knowledge base:";

const INSTRUCTIONS: &str = "Provide the most relevant and accurate response to the user \
query. Be friendly, helpful, and specific to Northeastern University. Keep responses \
concise but informative.";

/// Immutable prompt context, built once at startup
#[derive(Debug, Clone)]
pub struct Knowledge {
    context: String,
}

impl Knowledge {
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
        }
    }

    pub fn system_prompt(&self) -> String {
        format!("{}\n\n{}\n\n{}", PERSONA, self.context, INSTRUCTIONS)
    }

    /// System prompt, then prior turns in order, then the new user input
    pub fn build_messages(&self, history: &[Message], input: &str) -> Vec<Message> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::system(self.system_prompt()));
        messages.extend(history.iter().cloned());
        messages.push(Message::user(input));
        messages
    }
}

impl Default for Knowledge {
    fn default() -> Self {
        Self::new(NORTHEASTERN_KNOWLEDGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Role;

    #[test]
    fn test_system_prompt_embeds_knowledge() {
        let prompt = Knowledge::default().system_prompt();
        assert!(prompt.starts_with("You are Oakbot"));
        assert!(prompt.contains("Founded in 1898"));
        assert!(prompt.ends_with("concise but informative."));
    }

    #[test]
    fn test_build_messages_order() {
        let knowledge = Knowledge::new("facts");
        let history = vec![Message::user("hi"), Message::assistant("hello")];

        let messages = knowledge.build_messages(&history, "what now?");
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[0].content.contains("facts"));
        assert_eq!(messages[1].content, "hi");
        assert_eq!(messages[2].content, "hello");
        assert_eq!(messages[3], Message::user("what now?"));
    }
}
