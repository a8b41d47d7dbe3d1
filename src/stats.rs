//! Occupancy and probe-length statistics

use crate::{slot::SlotState, table::ProbeTable};

/// Snapshot of a table's bucket usage and probe lengths.
///
/// The probe length of an entry is the number of buckets a lookup for it visits: its distance
/// from its home bucket plus one.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TableStats {
    /// Number of buckets
    pub capacity: usize,
    /// Buckets holding an entry
    pub occupied: usize,
    /// Tombstones
    pub deleted: usize,
    /// Vacant buckets
    pub vacant: usize,
    /// `occupied / capacity`
    pub load_factor: f64,
    /// Mean probe length over all entries, 0 for an empty table
    pub mean_probe_length: f64,
    /// Longest probe length, 0 for an empty table
    pub max_probe_length: usize,
}

impl TableStats {
    /// Prints a human-readable summary to stdout
    pub fn print(&self) {
        println!("capacity:          {}", self.capacity);
        println!("occupied:          {}", self.occupied);
        println!("deleted:           {}", self.deleted);
        println!("vacant:            {}", self.vacant);
        println!("load factor:       {:.3}", self.load_factor);
        println!("mean probe length: {:.3}", self.mean_probe_length);
        println!("max probe length:  {}", self.max_probe_length);
    }
}

/// Probe length of an entry at `index` whose home bucket is `home`
#[allow(clippy::arithmetic_side_effects)]
fn probe_length(home: usize, index: usize, capacity: usize) -> usize {
    let distance = if index >= home { index - home } else { capacity - home + index };
    distance + 1
}

impl<K, V, S> ProbeTable<'_, K, V, S>
where
    K: ?Sized,
    V: ?Sized,
    S: Fn(&K) -> u32,
{
    /// Collects occupancy counts and probe lengths. Scans every bucket.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> TableStats {
        let mut stats = TableStats {
            capacity: self.capacity(),
            load_factor: self.load_factor(),
            ..TableStats::default()
        };

        for state in self.slot_states() {
            match state {
                SlotState::Occupied => stats.occupied = stats.occupied.saturating_add(1),
                SlotState::Deleted => stats.deleted = stats.deleted.saturating_add(1),
                SlotState::Vacant => stats.vacant = stats.vacant.saturating_add(1),
            }
        }

        let capacity = self.capacity();
        let mut total = 0_usize;
        for (home, index) in self.entry_positions() {
            let length = probe_length(home, index, capacity);
            total = total.saturating_add(length);
            stats.max_probe_length = stats.max_probe_length.max(length);
        }
        if stats.occupied > 0 {
            stats.mean_probe_length = total as f64 / stats.occupied as f64;
        }

        stats
    }

    /// Returns `histogram` where `histogram[n]` is the number of entries with probe length
    /// `n + 1`
    #[must_use]
    pub fn probe_histogram(&self) -> Vec<usize> {
        let capacity = self.capacity();
        let mut histogram: Vec<usize> = Vec::new();

        for (home, index) in self.entry_positions() {
            let bin = probe_length(home, index, capacity).saturating_sub(1);
            if histogram.len() <= bin {
                histogram.resize(bin.saturating_add(1), 0);
            }
            if let Some(count) = histogram.get_mut(bin) {
                *count = count.saturating_add(1);
            }
        }

        histogram
    }
}
