//! Tunables for `ProbeTable`

use crate::error::{Result, TableError};

/// Default ratio of occupied slots to capacity above which the table grows
pub const DEFAULT_LOAD_FACTOR: f64 = 0.7;

/// How aggressively `remove` turns tombstones back into vacant slots.
///
/// A tombstone directly followed by a vacant slot cannot lie on the probe path of any live
/// entry, so it is always safe to reclaim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TombstonePolicy {
    /// Reclaim the removed slot, then at most one tombstone directly before it
    #[default]
    SingleStep,
    /// Reclaim the removed slot, then every tombstone in the contiguous run before it.
    ///
    /// Shortens long-run probe lengths under heavy churn. This differs from the baseline
    /// behaviour: longer tombstone runs are reclaimed in full instead of by one step.
    Cascade,
}

/// Configuration applied to a table at construction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableConfig {
    /// Growth threshold, in `(0.0, 1.0]`
    pub load_factor_threshold: f64,
    /// Tombstone reclamation strategy used by `remove`
    pub tombstone_policy: TombstonePolicy,
    /// Upper bound on the bucket count; growth beyond it fails as an allocation failure
    pub max_capacity: Option<usize>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            load_factor_threshold: DEFAULT_LOAD_FACTOR,
            tombstone_policy: TombstonePolicy::default(),
            max_capacity: None,
        }
    }
}

impl TableConfig {
    /// Sets the growth threshold
    #[must_use]
    pub fn with_load_factor_threshold(mut self, threshold: f64) -> Self {
        self.load_factor_threshold = threshold;
        self
    }

    /// Sets the tombstone reclamation strategy
    #[must_use]
    pub fn with_tombstone_policy(mut self, policy: TombstonePolicy) -> Self {
        self.tombstone_policy = policy;
        self
    }

    /// Caps the number of buckets the table may grow to
    #[must_use]
    pub fn with_max_capacity(mut self, max_capacity: usize) -> Self {
        self.max_capacity = Some(max_capacity);
        self
    }

    /// Checks the configuration against a table's initial capacity
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidArgument`] if the threshold is outside `(0.0, 1.0]` or the
    /// capacity ceiling is below `capacity`.
    pub fn validate(&self, capacity: usize) -> Result<()> {
        if !(self.load_factor_threshold > 0.0 && self.load_factor_threshold <= 1.0) {
            return Err(TableError::InvalidArgument("load factor threshold must be in (0, 1]"));
        }
        if self.max_capacity.is_some_and(|max| max < capacity) {
            return Err(TableError::InvalidArgument("max capacity is below the initial capacity"));
        }
        Ok(())
    }
}
