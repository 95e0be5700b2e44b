//! Bounded FIFO of routine tokens.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::{ScheduleError, ScheduleResult};
use crate::models::{Token, TokenId};

/// Fixed-capacity routine queue for one doctor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutineQueue {
    capacity: usize,
    tokens: VecDeque<Token>,
}

impl RoutineQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            tokens: VecDeque::with_capacity(capacity),
        }
    }

    /// Append to the tail.
    pub fn enqueue(&mut self, token: Token) -> ScheduleResult<()> {
        if self.is_full() {
            return Err(ScheduleError::QueueFull {
                capacity: self.capacity,
            });
        }
        self.tokens.push_back(token);
        Ok(())
    }

    /// Take from the front.
    pub fn dequeue(&mut self) -> ScheduleResult<Token> {
        self.tokens.pop_front().ok_or(ScheduleError::QueueEmpty)
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.front()
    }

    /// Remove one token from anywhere in the queue.
    ///
    /// Drains the queue and re-enqueues everything except the first token with
    /// a matching id, so the relative order of the others is unchanged. O(capacity).
    pub fn remove(&mut self, token_id: TokenId) -> Option<Token> {
        let mut removed = None;
        let drained: Vec<Token> = self.tokens.drain(..).collect();
        for token in drained {
            if removed.is_none() && token.id == token_id {
                removed = Some(token);
            } else {
                self.tokens.push_back(token);
            }
        }
        removed
    }

    /// Tokens front to back.
    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.tokens.len() >= self.capacity
    }
}
