//! Per-invocation conversation state

use vantage_llm::{Message, Role};

/// Ordered, append-only message log owned by one agent invocation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentState {
    messages: Vec<Message>,
}

impl AgentState {
    /// Seed a state with a single user message
    pub fn new(user_text: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::user(user_text)],
        }
    }

    /// Resume from an existing message sequence
    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// Insert `prompt` as the first message unless a system message already leads
    ///
    /// Returns whether a message was inserted.
    pub fn ensure_system_prompt(&mut self, prompt: &str) -> bool {
        if self
            .messages
            .first()
            .is_some_and(|m| m.role == Role::System)
        {
            return false;
        }
        self.messages.insert(0, Message::system(prompt));
        true
    }

    /// Append a message
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Messages in order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Most recent message, if any
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Text of the most recent assistant message
    pub fn last_assistant_text(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
            .and_then(Message::text)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_inserted_once() {
        let mut state = AgentState::new("What is TCS trading at?");
        assert!(state.ensure_system_prompt("You are VANTAGE"));
        assert!(!state.ensure_system_prompt("You are VANTAGE"));

        assert_eq!(state.len(), 2);
        assert_eq!(state.messages()[0].role, Role::System);
        assert_eq!(state.messages()[1].role, Role::User);
    }

    #[test]
    fn test_existing_system_prompt_kept() {
        let mut state = AgentState::from_messages(vec![
            Message::system("custom"),
            Message::user("hi"),
        ]);
        assert!(!state.ensure_system_prompt("You are VANTAGE"));
        assert_eq!(state.messages()[0].text(), Some("custom"));
    }

    #[test]
    fn test_last_assistant_text() {
        let mut state = AgentState::new("hi");
        assert_eq!(state.last_assistant_text(), None);
        state.push(Message::assistant("first"));
        state.push(Message::tool_result("c1", "tool output"));
        assert_eq!(state.last_assistant_text(), Some("first"));
    }
}
