//! Conversation - Append-only transcript scoped to one document

use serde::Serialize;

use crate::document::DocumentId;
use crate::turn::Turn;

/// Ordered sequence of turns for a single document.
///
/// Insertion order is conversation order. Turns are never removed,
/// reordered or merged, even when two turns carry identical content.
#[derive(Serialize, Clone, Debug, Default)]
pub struct Conversation {
    document_id: Option<DocumentId>,
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new(document_id: Option<DocumentId>) -> Self {
        Self {
            document_id,
            turns: Vec::new(),
        }
    }

    pub fn document_id(&self) -> Option<&DocumentId> {
        self.document_id.as_ref()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Append a turn and return a reference to it.
    pub fn push(&mut self, turn: Turn) -> &Turn {
        self.turns.push(turn);
        &self.turns[self.turns.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_conversation_is_empty() {
        let conversation = Conversation::new(DocumentId::parse("doc_123"));
        assert!(conversation.is_empty());
        assert_eq!(conversation.document_id().unwrap().as_str(), "doc_123");
    }

    #[test]
    fn test_push_preserves_order_and_duplicates() {
        let mut conversation = Conversation::new(None);
        conversation.push(Turn::user("hello"));
        conversation.push(Turn::assistant("hi", vec![]));
        conversation.push(Turn::user("hello"));

        let contents: Vec<_> = conversation.turns().iter().map(|t| t.content()).collect();
        assert_eq!(contents, vec!["hello", "hi", "hello"]);
    }
}
