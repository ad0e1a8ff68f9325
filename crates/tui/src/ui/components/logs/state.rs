use std::collections::VecDeque;

/// Maximum number of entries retained for display.
pub const MAX_LOG_ENTRIES: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// One user-visible activity line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub msg: String,
}

/// Bounded list of recent activity, oldest first.
#[derive(Debug)]
pub struct LogsState {
    entries: VecDeque<LogEntry>,
}

impl Default for LogsState {
    fn default() -> Self {
        let mut state = Self {
            entries: VecDeque::with_capacity(MAX_LOG_ENTRIES),
        };
        state.info("Ctrl+A adds a relation; Ctrl+S submits the composition");
        state
    }
}

impl LogsState {
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &LogEntry> + ExactSizeIterator {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn info(&mut self, msg: impl Into<String>) {
        self.push(LogLevel::Info, msg.into());
    }

    pub fn warn(&mut self, msg: impl Into<String>) {
        self.push(LogLevel::Warn, msg.into());
    }

    pub fn error(&mut self, msg: impl Into<String>) {
        self.push(LogLevel::Error, msg.into());
    }

    fn push(&mut self, level: LogLevel, msg: String) {
        if self.entries.len() == MAX_LOG_ENTRIES {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry { level, msg });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oldest_entries_are_evicted_at_capacity() {
        let mut logs = LogsState::default();
        for index in 0..MAX_LOG_ENTRIES + 5 {
            logs.info(format!("entry {index}"));
        }
        assert_eq!(logs.len(), MAX_LOG_ENTRIES);
        assert_eq!(logs.entries().next().map(|entry| entry.msg.as_str()), Some("entry 5"));
        assert_eq!(
            logs.entries().last().map(|entry| entry.msg.as_str()),
            Some(format!("entry {}", MAX_LOG_ENTRIES + 4).as_str())
        );
    }
}
