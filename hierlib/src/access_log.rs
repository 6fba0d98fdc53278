use std::collections::VecDeque;
use serde::{Deserialize, Serialize};

/// How much of an access log to keep
///
/// Logs grow by one entry per access for the lifetime of a simulation, so long runs should bound
/// or disable them. `Unbounded` keeps every entry and is the default
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogMode {
    Disabled,
    #[default]
    Unbounded,
    /// Keeps only the newest `n` entries
    Bounded(usize),
}

/// An append-only, ordered record of accesses
#[derive(Debug, Clone)]
pub struct AccessLog<T> {
    mode: LogMode,
    entries: VecDeque<T>,
}

impl<T> AccessLog<T> {
    /// Creates an empty log. Nothing is allocated until the first entry is kept
    pub fn new(mode: LogMode) -> Self {
        Self { mode, entries: VecDeque::new() }
    }

    pub fn push(&mut self, entry: T) {
        match self.mode {
            LogMode::Disabled => {}
            LogMode::Unbounded => self.entries.push_back(entry),
            LogMode::Bounded(0) => {}
            LogMode::Bounded(n) => {
                if self.entries.len() == n {
                    self.entries.pop_front();
                }
                self.entries.push_back(entry);
            }
        }
    }

    /// Oldest entry first
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn mode(&self) -> LogMode {
        self.mode
    }

    /// Switches mode, trimming the oldest entries if the new bound is smaller
    pub fn set_mode(&mut self, mode: LogMode) {
        match mode {
            LogMode::Disabled => self.entries.clear(),
            LogMode::Unbounded => {}
            LogMode::Bounded(n) => {
                while self.entries.len() > n {
                    self.entries.pop_front();
                }
            }
        }
        self.mode = mode;
    }
}

impl<T> Default for AccessLog<T> {
    fn default() -> Self {
        Self::new(LogMode::default())
    }
}
