//! # Message Log
//!
//! Bounded history of narrated game events.

use crate::game::GameEvent;
use std::collections::VecDeque;

/// Keeps the most recent messages, dropping the oldest first.
#[derive(Debug, Clone)]
pub struct MessageLog {
    messages: VecDeque<String>,
    max_messages: usize,
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new(100)
    }
}

impl MessageLog {
    pub fn new(max_messages: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(max_messages),
            max_messages,
        }
    }

    pub fn push(&mut self, message: impl Into<String>) {
        if self.max_messages == 0 {
            return;
        }
        if self.messages.len() == self.max_messages {
            self.messages.pop_front();
        }
        self.messages.push_back(message.into());
    }

    /// Narrates events, skipping the ones a player would not care to read.
    pub fn extend_events<'a>(&mut self, events: impl IntoIterator<Item = &'a GameEvent>) {
        for event in events {
            if !matches!(event, GameEvent::PlayerMoved { .. } | GameEvent::MonsterMoved { .. }) {
                self.push(event.to_string());
            }
        }
    }

    /// The latest `count` messages, oldest first.
    pub fn recent(&self, count: usize) -> impl Iterator<Item = &str> + '_ {
        let skip = self.messages.len().saturating_sub(count);
        self.messages.iter().skip(skip).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Position;

    #[test]
    fn test_log_is_bounded() {
        let mut log = MessageLog::new(2);
        log.push("one");
        log.push("two");
        log.push("three");
        assert_eq!(log.recent(5).collect::<Vec<_>>(), ["two", "three"]);
    }

    #[test]
    fn test_movement_is_not_narrated() {
        let mut log = MessageLog::default();
        let events = [
            GameEvent::PlayerMoved {
                from: Position::new(1, 1),
                to: Position::new(2, 1),
            },
            GameEvent::DoorOpened {
                position: Position::new(3, 1),
            },
        ];
        log.extend_events(&events);
        assert_eq!(log.len(), 1);
        assert_eq!(log.recent(1).next(), Some("A door at (3, 1) swings open"));
    }
}
