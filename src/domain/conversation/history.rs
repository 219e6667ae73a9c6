//! Bounded conversation history.

use super::{Message, MessageRole};

/// Ordered message store the Conversation Engine sends to the model.
///
/// Implementations decide how the sequence is kept bounded.
pub trait ConversationHistory: Send + Sync {
    /// Appends a message, applying the eviction policy.
    fn push(&mut self, message: Message);

    /// Messages in conversation order.
    fn messages(&self) -> Vec<Message>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&mut self);
}

/// Sliding window over the most recent messages.
///
/// Holds at most `limit` messages. Oldest messages are evicted first, and
/// eviction continues past the limit until the window starts with a user
/// message, because model APIs reject a conversation that opens with an
/// assistant turn. System messages are never stored; the system prompt is
/// sent separately.
#[derive(Debug, Clone)]
pub struct BoundedHistory {
    limit: usize,
    messages: Vec<Message>,
}

impl BoundedHistory {
    /// Creates a history holding at most `limit` messages (minimum 1).
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
            messages: Vec::new(),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    fn evict(&mut self) {
        let overflow = self.messages.len().saturating_sub(self.limit);
        if overflow > 0 {
            self.messages.drain(..overflow);
        }
        let leading = self
            .messages
            .iter()
            .take_while(|m| m.role != MessageRole::User)
            .count();
        self.messages.drain(..leading);
    }
}

impl ConversationHistory for BoundedHistory {
    fn push(&mut self, message: Message) {
        if message.role == MessageRole::System {
            return;
        }
        self.messages.push(message);
        self.evict();
    }

    fn messages(&self) -> Vec<Message> {
        self.messages.clone()
    }

    fn len(&self) -> usize {
        self.messages.len()
    }

    fn clear(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn keeps_messages_in_order() {
        let mut history = BoundedHistory::new(10);
        history.push(Message::user("one"));
        history.push(Message::assistant("two"));

        let contents: Vec<_> = history.messages().into_iter().map(|m| m.content).collect();
        assert_eq!(contents, vec!["one", "two"]);
    }

    #[test]
    fn evicts_oldest_beyond_limit() {
        let mut history = BoundedHistory::new(3);
        history.push(Message::user("u1"));
        history.push(Message::assistant("a1"));
        history.push(Message::user("u2"));
        history.push(Message::assistant("a2"));
        history.push(Message::user("u3"));

        let contents: Vec<_> = history.messages().into_iter().map(|m| m.content).collect();
        assert_eq!(contents, vec!["u2", "a2", "u3"]);
    }

    #[test]
    fn never_starts_with_assistant_message() {
        let mut history = BoundedHistory::new(2);
        history.push(Message::user("u1"));
        history.push(Message::assistant("a1"));
        history.push(Message::assistant("a2"));
        history.push(Message::user("u2"));

        let messages = history.messages();
        assert_eq!(messages[0], Message::user("u2"));
        assert_eq!(messages.len(), 1);
    }

    #[test]
    fn ignores_system_messages() {
        let mut history = BoundedHistory::new(5);
        history.push(Message::system("be helpful"));
        assert!(history.is_empty());
    }

    #[test]
    fn clear_empties_history() {
        let mut history = BoundedHistory::new(5);
        history.push(Message::user("u1"));
        history.clear();
        assert_eq!(history.len(), 0);
    }

    proptest! {
        #[test]
        fn never_exceeds_limit(limit in 1usize..20, roles in proptest::collection::vec(any::<bool>(), 0..100)) {
            let mut history = BoundedHistory::new(limit);
            for (i, is_user) in roles.iter().enumerate() {
                let msg = if *is_user {
                    Message::user(i.to_string())
                } else {
                    Message::assistant(i.to_string())
                };
                history.push(msg);
                prop_assert!(history.len() <= limit);
            }
        }
    }
}
