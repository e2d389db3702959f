//! Bounded conversation memory.

use std::collections::VecDeque;

use isla_core::{Message, Role};

/// The most recent user/assistant turns, oldest evicted first.
///
/// Eviction is per turn, so an odd capacity can leave an answer at the front
/// whose question is gone. [`replay`](Self::replay) skips such leading turns.
#[derive(Debug, Clone)]
pub struct History {
    turns: VecDeque<Message>,
    capacity: usize,
}

impl History {
    /// `capacity` is clamped to at least one turn.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { turns: VecDeque::with_capacity(capacity), capacity }
    }

    pub fn push(&mut self, turn: Message) {
        if self.turns.len() == self.capacity {
            self.turns.pop_front();
        }
        self.turns.push_back(turn);
    }

    pub fn snapshot(&self) -> Vec<Message> {
        self.turns.iter().cloned().collect()
    }

    /// Turns to resend to the model, starting at the oldest retained question.
    pub fn replay(&self) -> Vec<Message> {
        self.turns.iter().skip_while(|m| m.role != Role::User).cloned().collect()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn oldest_turn_is_evicted_first() {
        let mut history = History::new(3);
        for i in 0..4 {
            history.push(Message::user(format!("q{i}")));
        }
        let contents: Vec<_> = history.snapshot().into_iter().map(|m| m.content).collect();
        assert_eq!(contents, ["q1", "q2", "q3"]);
    }

    #[test]
    fn replay_drops_an_answer_without_its_question() {
        let mut history = History::new(3);
        for turn in [Message::user("q1"), Message::assistant("a1"), Message::user("q2"), Message::assistant("a2")] {
            history.push(turn);
        }
        assert_eq!(history.len(), 3);
        let replayed: Vec<_> = history.replay().into_iter().map(|m| m.content).collect();
        assert_eq!(replayed, ["q2", "a2"]);
    }

    #[test]
    fn clear_empties_history() {
        let mut history = History::new(2);
        history.push(Message::user("hola"));
        history.clear();
        assert!(history.is_empty());
        assert!(history.snapshot().is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_length_never_exceeds_capacity(capacity in 1usize..20, pushes in 0usize..60) {
            let mut history = History::new(capacity);
            for i in 0..pushes {
                history.push(Message::assistant(i.to_string()));
                prop_assert!(history.len() <= capacity);
            }
            prop_assert_eq!(history.len(), pushes.min(capacity));
            if pushes > capacity {
                let first = history.snapshot()[0].content.clone();
                prop_assert_eq!(first, (pushes - capacity).to_string());
            }
        }
    }
}
