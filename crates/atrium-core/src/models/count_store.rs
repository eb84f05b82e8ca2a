/// Per-chat exchange counts for the active project, index-aligned to chat
/// number (index i belongs to chat i+1).
///
/// Reconciliation is last-writer-wins: the poller overwrites the whole list
/// with server truth, and local completions advance one slot optimistically
/// in between. The two may diverge for up to one poll interval, never
/// longer.
pub struct CountStore {
    counts: Vec<u64>,
}

impl CountStore {
    pub fn new() -> Self {
        Self { counts: Vec::new() }
    }

    /// Replace the whole list with the server's answer.
    pub fn overwrite(&mut self, counts: Vec<u64>) {
        self.counts = counts;
    }

    /// Optimistically bump the count for one chat slot, growing the list
    /// when the server hasn't caught up to that chat yet.
    pub fn increment(&mut self, index: usize) {
        if index >= self.counts.len() {
            self.counts.resize(index + 1, 0);
        }
        self.counts[index] += 1;
    }

    /// Register a fresh chat with zero exchanges. Counts survive session
    /// resets; only project switches clear them.
    pub fn append_new_chat(&mut self) -> usize {
        self.counts.push(0);
        self.counts.len() - 1
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }
}

impl Default for CountStore {
    fn default() -> Self {
        Self::new()
    }
}
