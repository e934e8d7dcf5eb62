// Bounded, timestamped message logs and the transient action slot.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

/// Entries kept per log before the oldest are dropped.
pub const LOG_CAPACITY: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub at: DateTime<Utc>,
    pub text: String,
}

/// A FIFO log that keeps only the most recent `capacity` entries.
#[derive(Debug, Clone)]
pub struct MessageLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::with_capacity(LOG_CAPACITY)
    }
}

impl MessageLog {
    pub fn with_capacity(capacity: usize) -> Self {
        MessageLog {
            entries: VecDeque::with_capacity(capacity.min(LOG_CAPACITY)),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, text: impl Into<String>) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry {
            at: Utc::now(),
            text: text.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// The single-slot "last action" message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionStatus {
    Error(String),
    Info(String),
}

impl ActionStatus {
    pub fn text(&self) -> &str {
        match self {
            ActionStatus::Error(text) | ActionStatus::Info(text) => text,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ActionStatus::Error(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_oldest_past_capacity() {
        let mut log = MessageLog::with_capacity(3);
        for i in 0..5 {
            log.push(format!("m{i}"));
        }
        let texts: Vec<_> = log.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["m2", "m3", "m4"]);
        assert_eq!(log.last().map(|e| e.text.as_str()), Some("m4"));
    }

    #[test]
    fn default_capacity() {
        let mut log = MessageLog::default();
        for i in 0..(LOG_CAPACITY + 10) {
            log.push(i.to_string());
        }
        assert_eq!(log.len(), LOG_CAPACITY);
    }
}
