//! Temporal debouncing for per-frame classifier output.

/// Commits a value only after it has been observed on `threshold` consecutive
/// updates. The committed value is sticky: it does not change while the raw
/// input flickers.
#[derive(Clone, Debug)]
pub struct Debouncer<T: PartialEq + Clone> {
    candidate: T,
    count: u32,
    committed: T,
    threshold: u32,
}

impl<T: PartialEq + Clone> Debouncer<T> {
    pub fn new(neutral: T, threshold: u32) -> Self {
        Self {
            candidate: neutral.clone(),
            count: 0,
            committed: neutral,
            threshold: threshold.max(1),
        }
    }

    /// Feed one raw observation and return the committed value.
    pub fn observe(&mut self, raw: T) -> &T {
        if raw == self.candidate {
            self.count = self.count.saturating_add(1);
        } else {
            self.candidate = raw;
            self.count = 1;
        }
        if self.count >= self.threshold {
            self.committed = self.candidate.clone();
        }
        &self.committed
    }

    /// Reset to `neutral` immediately, as if it had already been stable.
    pub fn force(&mut self, neutral: T) {
        self.candidate = neutral.clone();
        self.committed = neutral;
        self.count = self.threshold;
    }

    pub fn committed(&self) -> &T {
        &self.committed
    }

    pub fn candidate(&self) -> &T {
        &self.candidate
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }
}
