//! Refresh diagnostics.

use vgen_models::MediaSlot;

/// A link that could not be reissued and was kept as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshFailure {
    /// Index of the scene within its batch (0 for a single scene)
    pub scene: usize,
    pub slot: MediaSlot,
    /// The original link, still in place
    pub url: String,
    pub reason: String,
}

/// Counts of what happened to the links of one scene or batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    /// Signed links replaced by a fresh one
    pub refreshed: usize,
    /// Public or unrelated links copied through
    pub unchanged: usize,
    /// Signed links kept because reissue failed
    pub fallbacks: Vec<RefreshFailure>,
}

impl RefreshReport {
    /// True when no signed link had to fall back.
    pub fn is_clean(&self) -> bool {
        self.fallbacks.is_empty()
    }

    /// Number of populated links looked at.
    pub fn total(&self) -> usize {
        self.refreshed + self.unchanged + self.fallbacks.len()
    }

    /// Fold a per-scene report into a batch report.
    pub fn merge_scene(&mut self, scene: usize, other: RefreshReport) {
        self.refreshed += other.refreshed;
        self.unchanged += other.unchanged;
        self.fallbacks
            .extend(other.fallbacks.into_iter().map(|f| RefreshFailure { scene, ..f }));
    }
}
