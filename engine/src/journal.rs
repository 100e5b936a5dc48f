// ═══════════════════════════════════════════════════════════════════════
// Journal — bounded, append-only game log read by renderers
// Each entry is mirrored to `tracing` under the `pandemic::log` target.
// ═══════════════════════════════════════════════════════════════════════

use std::collections::VecDeque;

pub const DEFAULT_LOG_CAPACITY: usize = 500;

#[derive(Debug, Clone)]
pub struct Journal {
    entries: VecDeque<String>,
    capacity: usize,
    muted: bool,
    /// Entries ever pushed, including ones already dropped.
    written: u64,
}

impl Journal {
    pub fn new(capacity: usize) -> Self {
        Journal { entries: VecDeque::new(), capacity: capacity.max(1), muted: false, written: 0 }
    }

    pub fn push(&mut self, entry: impl Into<String>) {
        if self.muted {
            return;
        }
        let entry = entry.into();
        tracing::info!(target: "pandemic::log", "{entry}");
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
        self.written += 1;
    }

    /// Stop recording. Used by simulated turns.
    pub fn mute(&mut self) {
        self.muted = true;
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// The newest `n` entries, oldest first.
    pub fn tail(&self, n: usize) -> Vec<&str> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries().skip(skip).collect()
    }

    /// Position marker for `since`.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Entries pushed after `mark` was taken that are still held.
    pub fn since(&self, mark: u64) -> Vec<&str> {
        let first_held = self.written - self.entries.len() as u64;
        let skip = mark.saturating_sub(first_held) as usize;
        self.entries().skip(skip).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for Journal {
    fn default() -> Self {
        Journal::new(DEFAULT_LOG_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_oldest_beyond_capacity() {
        let mut journal = Journal::new(3);
        for i in 0..5 {
            journal.push(format!("line {i}"));
        }
        assert_eq!(journal.len(), 3);
        assert_eq!(journal.tail(10), vec!["line 2", "line 3", "line 4"]);
        assert_eq!(journal.tail(1), vec!["line 4"]);
    }

    #[test]
    fn since_skips_what_was_already_seen() {
        let mut journal = Journal::new(4);
        journal.push("a");
        journal.push("b");
        let mark = journal.written();
        journal.push("c");
        assert_eq!(journal.since(mark), vec!["c"]);
        for line in ["d", "e", "f"] {
            journal.push(line);
        }
        // a and b have been dropped
        assert_eq!(journal.since(mark), vec!["c", "d", "e", "f"]);
        assert_eq!(journal.since(journal.written()), Vec::<&str>::new());
    }

    #[test]
    fn muted_journal_records_nothing() {
        let mut journal = Journal::default();
        journal.push("kept");
        journal.mute();
        journal.push("dropped");
        assert_eq!(journal.entries().collect::<Vec<_>>(), vec!["kept"]);
    }
}
