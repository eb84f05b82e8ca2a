use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic request generation.
///
/// Every fetch records the generation it started under; a response whose
/// generation is no longer current is dropped instead of applied, so a
/// slow response can never overwrite state written after a newer chat or
/// project switch.
pub(crate) struct Generation(AtomicU64);

impl Generation {
    pub(crate) fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    /// Start a new request under a fresh generation.
    pub(crate) fn begin(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn current(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    /// Invalidate all in-flight requests without starting a new one.
    pub(crate) fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn is_current(&self, generation: u64) -> bool {
        self.current() == generation
    }
}
