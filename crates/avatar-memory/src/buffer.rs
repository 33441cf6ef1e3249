// SPDX-FileCopyrightText: 2026 Avatar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded FIFO of the most recent turns.

use std::collections::VecDeque;
use std::num::NonZeroUsize;

use crate::types::Turn;

/// The last K turns of a conversation, oldest first.
///
/// Appending past capacity evicts from the front, so `len() <= capacity()`
/// holds after every operation.
#[derive(Debug, Clone)]
pub struct TurnBuffer {
    turns: VecDeque<Turn>,
    capacity: NonZeroUsize,
}

impl TurnBuffer {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            turns: VecDeque::with_capacity(capacity.get()),
            capacity,
        }
    }

    /// Adds a turn at the end, evicting the oldest turns on overflow.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push_back(turn);
        while self.turns.len() > self.capacity.get() {
            self.turns.pop_front();
        }
    }

    /// Snapshot of the buffer in chronological order.
    pub fn contents(&self) -> Vec<Turn> {
        self.turns.iter().cloned().collect()
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

    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn window(k: usize) -> NonZeroUsize {
        NonZeroUsize::new(k).unwrap()
    }

    fn numbered(i: usize) -> Turn {
        Turn::new(format!("in {i}"), format!("out {i}"))
    }

    #[test]
    fn starts_empty() {
        let buffer = TurnBuffer::new(window(3));
        assert!(buffer.is_empty());
        assert_eq!(buffer.contents(), vec![]);
        assert_eq!(buffer.capacity().get(), 3);
    }

    #[test]
    fn evicts_oldest_first() {
        let mut buffer = TurnBuffer::new(window(2));
        for i in 0..3 {
            buffer.append(numbered(i));
        }
        assert_eq!(buffer.contents(), vec![numbered(1), numbered(2)]);
    }

    #[test]
    fn window_of_one_keeps_latest() {
        let mut buffer = TurnBuffer::new(window(1));
        buffer.append(numbered(0));
        buffer.append(numbered(1));
        assert_eq!(buffer.contents(), vec![numbered(1)]);
    }

    #[test]
    fn clear_empties_buffer() {
        let mut buffer = TurnBuffer::new(window(2));
        buffer.append(numbered(0));
        buffer.clear();
        assert!(buffer.is_empty());
        buffer.append(numbered(1));
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn contents_is_a_snapshot() {
        let mut buffer = TurnBuffer::new(window(2));
        buffer.append(numbered(0));
        let snapshot = buffer.contents();
        buffer.append(numbered(1));
        assert_eq!(snapshot, vec![numbered(0)]);
    }

    proptest! {
        #[test]
        fn keeps_exactly_the_last_k(k in 1usize..16, n in 0usize..64) {
            let mut buffer = TurnBuffer::new(window(k));
            let all: Vec<Turn> = (0..n).map(numbered).collect();
            for turn in &all {
                buffer.append(turn.clone());
                prop_assert!(buffer.len() <= k);
            }
            let expected: Vec<Turn> = all[n.saturating_sub(k)..].to_vec();
            prop_assert_eq!(buffer.contents(), expected);
        }
    }
}
