use std::{fmt, mem, ptr, slice};

use tracing::{debug, trace, warn};

use crate::{
    config::{TableConfig, TombstonePolicy},
    error::{Result, TableError},
    slot::{Slot, SlotState},
};

/// Default key comparison: two keys are the same key only if they are the same reference
fn same_reference<K: ?Sized>(a: &K, b: &K) -> bool {
    ptr::eq(a, b)
}

/// Reduces a hash to a bucket index. `capacity` is never zero.
#[allow(clippy::arithmetic_side_effects)]
fn reduce(hash: u32, capacity: usize) -> usize {
    hash as usize % capacity
}

/// The index after `index`, wrapping at `capacity`
fn next_index(index: usize, capacity: usize) -> usize {
    let next = index.saturating_add(1);
    if next >= capacity { 0 } else { next }
}

/// The index before `index`, wrapping to `capacity - 1`
fn prev_index(index: usize, capacity: usize) -> usize {
    index.checked_sub(1).unwrap_or(capacity.saturating_sub(1))
}

/// Allocates `capacity` vacant buckets without aborting on allocation failure
fn allocate_buckets<'a, K: ?Sized, V: ?Sized>(capacity: usize) -> Result<Vec<Slot<'a, K, V>>> {
    let mut buckets = Vec::new();
    buckets
        .try_reserve_exact(capacity)
        .map_err(|_| TableError::AllocationFailure { requested: capacity })?;
    buckets.resize(capacity, Slot::Vacant);
    Ok(buckets)
}

/// Writes an entry into the first vacant bucket at or after `home`.
///
/// Used while rebuilding storage: the source entries are already duplicate-free and the fresh
/// array holds no tombstones.
fn place_unchecked<'a, K: ?Sized, V: ?Sized>(
    buckets: &mut [Slot<'a, K, V>],
    home: usize,
    key: &'a K,
    value: &'a V,
) -> Result<()> {
    let capacity = buckets.len();
    let mut index = home;

    for _ in 0..capacity {
        match buckets.get_mut(index) {
            Some(slot) if slot.is_vacant() => {
                *slot = Slot::Occupied { key, value };
                return Ok(());
            }
            _ => index = next_index(index, capacity),
        }
    }

    Err(TableError::CapacityExhausted { capacity })
}

/// Outcome of walking the probe sequence of a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    /// The key is stored at this index
    Found(usize),
    /// The key is absent; carries the bucket an insert would use, if there is one
    Missing(Option<usize>),
}

/// An open-addressing hash table with linear probing and tombstone deletion.
///
/// Keys and values are borrowed references: the table never owns, clones or drops them.
/// Keys are compared by *reference identity* unless the table is built with
/// [`ProbeTable::with_key_eq`], so two value-equal keys at different addresses are different
/// keys. Zero-sized key types may share an address and should use a custom predicate.
///
/// The hash function must be pure: it is called again for every entry when the table grows.
///
/// Note: This implementation is not thread-safe. Wrap it in a lock to share it.
pub struct ProbeTable<'a, K: ?Sized, V: ?Sized, S> {
    /// The bucket array; never empty
    buckets: Vec<Slot<'a, K, V>>,
    /// Number of occupied buckets
    len: usize,
    /// Caller-supplied hash function
    hasher: S,
    /// Key comparison used while probing
    key_eq: fn(&K, &K) -> bool,
    /// Growth threshold, tombstone policy and capacity ceiling
    config: TableConfig,
}

impl<K: ?Sized, V: ?Sized, S> fmt::Debug for ProbeTable<'_, K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProbeTable")
            .field("capacity", &self.buckets.len())
            .field("len", &self.len)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<'a, K, V, S> ProbeTable<'a, K, V, S>
where
    K: ?Sized,
    V: ?Sized,
    S: Fn(&K) -> u32,
{
    /// Creates a table with `capacity` vacant buckets and the default configuration
    ///
    /// # Errors
    ///
    /// [`TableError::InvalidArgument`] if `capacity` is zero, [`TableError::AllocationFailure`]
    /// if the bucket array cannot be allocated.
    pub fn new(capacity: usize, hasher: S) -> Result<Self> {
        Self::with_config(capacity, hasher, TableConfig::default())
    }

    /// Creates a table with an explicit configuration
    ///
    /// # Errors
    ///
    /// As [`ProbeTable::new`], plus [`TableError::InvalidArgument`] for an invalid `config`.
    pub fn with_config(capacity: usize, hasher: S, config: TableConfig) -> Result<Self> {
        Self::with_key_eq(capacity, hasher, config, same_reference::<K>)
    }

    /// Creates a table that compares keys with `key_eq` instead of by reference.
    ///
    /// `key_eq` must agree with `hasher`: keys it considers equal must hash equally.
    ///
    /// # Errors
    ///
    /// As [`ProbeTable::with_config`].
    pub fn with_key_eq(
        capacity: usize,
        hasher: S,
        config: TableConfig,
        key_eq: fn(&K, &K) -> bool,
    ) -> Result<Self> {
        if capacity == 0 {
            return Err(TableError::InvalidArgument("capacity must be positive"));
        }
        config.validate(capacity)?;
        let buckets = allocate_buckets(capacity)?;

        Ok(Self { buckets, len: 0, hasher, key_eq, config })
    }

    /// Releases the bucket array. The borrowed keys and values are untouched.
    pub fn destroy(self) {
        trace!(capacity = self.buckets.len(), len = self.len, "destroying table");
        drop(self);
    }

    /// Home bucket of `key` under the current capacity
    fn home_index(&self, key: &K) -> usize {
        reduce((self.hasher)(key), self.buckets.len())
    }

    /// Walks the probe run of `key` from its home bucket to the first vacant bucket.
    ///
    /// Tombstones are skipped but the first one seen is remembered as the insertion point.
    /// The walk visits each bucket at most once.
    fn probe(&self, key: &K) -> Probe {
        let capacity = self.buckets.len();
        let mut index = self.home_index(key);
        let mut first_tombstone = None;

        for _ in 0..capacity {
            match self.buckets.get(index).copied() {
                Some(Slot::Vacant) => return Probe::Missing(Some(first_tombstone.unwrap_or(index))),
                Some(Slot::Deleted) => {
                    if first_tombstone.is_none() {
                        first_tombstone = Some(index);
                    }
                }
                Some(Slot::Occupied { key: stored, .. }) => {
                    if (self.key_eq)(stored, key) {
                        return Probe::Found(index);
                    }
                }
                None => break,
            }
            index = next_index(index, capacity);
        }

        Probe::Missing(first_tombstone)
    }

    /// Overwrites the bucket at `index`
    fn set_slot(&mut self, index: usize, slot: Slot<'a, K, V>) {
        if let Some(bucket) = self.buckets.get_mut(index) {
            *bucket = slot;
        }
    }

    /// Inserts a new entry.
    ///
    /// If the insert pushes the load factor over the threshold the table grows. A failed growth
    /// is logged and deferred; the insert itself still succeeds.
    ///
    /// # Errors
    ///
    /// [`TableError::DuplicateKey`] if `key` is already stored (the table is unchanged; use
    /// [`ProbeTable::update`] to overwrite), [`TableError::CapacityExhausted`] if every bucket
    /// is occupied.
    pub fn insert(&mut self, key: &'a K, value: &'a V) -> Result<()> {
        let index = match self.probe(key) {
            Probe::Found(_) => return Err(TableError::DuplicateKey),
            Probe::Missing(None) => {
                return Err(TableError::CapacityExhausted { capacity: self.buckets.len() });
            }
            Probe::Missing(Some(index)) => index,
        };

        self.set_slot(index, Slot::Occupied { key, value });
        self.len = self.len.saturating_add(1);

        if self.load_factor() > self.config.load_factor_threshold {
            self.resize().unwrap_or_else(|error| {
                warn!(%error, len = self.len, capacity = self.buckets.len(), "growth deferred");
            });
        }

        Ok(())
    }

    /// Replaces the value stored for `key`, returning the previous one
    ///
    /// # Errors
    ///
    /// [`TableError::KeyNotFound`] if `key` is not stored.
    pub fn update(&mut self, key: &K, value: &'a V) -> Result<&'a V> {
        let Probe::Found(index) = self.probe(key) else {
            return Err(TableError::KeyNotFound);
        };

        match self.buckets.get_mut(index) {
            Some(Slot::Occupied { value: stored, .. }) => Ok(mem::replace(stored, value)),
            _ => Err(TableError::KeyNotFound),
        }
    }

    /// Removes `key`, returning its value. The value is handed back, not dropped.
    ///
    /// The bucket becomes a tombstone, which is reclaimed immediately when the next bucket is
    /// vacant (see [`TombstonePolicy`]).
    ///
    /// # Errors
    ///
    /// [`TableError::KeyNotFound`] if `key` is not stored.
    pub fn remove(&mut self, key: &K) -> Result<&'a V> {
        let Probe::Found(index) = self.probe(key) else {
            return Err(TableError::KeyNotFound);
        };
        let Some((_, value)) = self.buckets.get(index).and_then(Slot::entry) else {
            return Err(TableError::KeyNotFound);
        };

        self.set_slot(index, Slot::Deleted);
        self.len = self.len.saturating_sub(1);
        self.reclaim_tombstones(index);

        Ok(value)
    }

    /// Turns the tombstone at `index` back into a vacant bucket if it ends its run, then
    /// reclaims tombstones directly before it according to the configured policy.
    fn reclaim_tombstones(&mut self, index: usize) {
        let capacity = self.buckets.len();
        if !self.buckets.get(next_index(index, capacity)).is_some_and(Slot::is_vacant) {
            return;
        }

        self.set_slot(index, Slot::Vacant);
        let mut reclaimed = 1_usize;
        let mut prev = prev_index(index, capacity);

        while prev != index && self.buckets.get(prev).is_some_and(Slot::is_deleted) {
            self.set_slot(prev, Slot::Vacant);
            reclaimed = reclaimed.saturating_add(1);
            if self.config.tombstone_policy == TombstonePolicy::SingleStep {
                break;
            }
            prev = prev_index(prev, capacity);
        }

        trace!(index, reclaimed, "reclaimed tombstones");
    }

    /// Returns the value stored for `key`
    ///
    /// # Errors
    ///
    /// [`TableError::KeyNotFound`] if `key` is not stored.
    pub fn get(&self, key: &K) -> Result<&'a V> {
        match self.probe(key) {
            Probe::Found(index) => self
                .buckets
                .get(index)
                .and_then(Slot::entry)
                .map(|(_, value)| value)
                .ok_or(TableError::KeyNotFound),
            Probe::Missing(_) => Err(TableError::KeyNotFound),
        }
    }

    /// Returns true if `key` is stored
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        matches!(self.probe(key), Probe::Found(_))
    }

    /// Returns true if some entry holds exactly this value reference. Scans every bucket.
    #[must_use]
    pub fn contains_value(&self, value: &V) -> bool {
        self.iter().any(|(_, stored)| ptr::eq(stored, value))
    }

    /// Doubles the capacity, rehashing every entry and dropping all tombstones.
    ///
    /// The new bucket array is built completely before it replaces the old one.
    ///
    /// # Errors
    ///
    /// [`TableError::AllocationFailure`] if the doubled capacity overflows, exceeds the
    /// configured ceiling or cannot be allocated. The table is left as it was.
    pub fn resize(&mut self) -> Result<()> {
        let old_capacity = self.buckets.len();
        let new_capacity = old_capacity
            .checked_mul(2)
            .ok_or(TableError::AllocationFailure { requested: usize::MAX })?;
        if self.config.max_capacity.is_some_and(|max| new_capacity > max) {
            return Err(TableError::AllocationFailure { requested: new_capacity });
        }

        let mut buckets = allocate_buckets(new_capacity)?;
        let mut tombstones = 0_usize;
        for slot in &self.buckets {
            match *slot {
                Slot::Occupied { key, value } => {
                    let home = reduce((self.hasher)(key), new_capacity);
                    place_unchecked(&mut buckets, home, key, value)?;
                }
                Slot::Deleted => tombstones = tombstones.saturating_add(1),
                Slot::Vacant => {}
            }
        }

        self.buckets = buckets;
        debug!(old_capacity, new_capacity, entries = self.len, tombstones, "resized table");

        Ok(())
    }
}

impl<'a, K: ?Sized, V: ?Sized, S> ProbeTable<'a, K, V, S> {
    /// Returns the number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the table holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of buckets
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the ratio of entries to buckets
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.buckets.len() as f64
    }

    /// Returns the configuration the table was built with
    #[must_use]
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Returns the tag of the bucket at `index`, or `None` past the end
    #[must_use]
    pub fn slot_state(&self, index: usize) -> Option<SlotState> {
        self.buckets.get(index).map(Slot::state)
    }

    /// Returns an iterator over the entries in bucket order, which is unrelated to insertion
    /// order
    #[must_use]
    #[allow(clippy::iter_without_into_iter)]
    pub fn iter(&self) -> Iter<'_, 'a, K, V> {
        Iter { slots: self.buckets.iter() }
    }

    /// Marks every bucket vacant. The capacity is kept.
    pub fn clear(&mut self) {
        self.buckets.fill(Slot::Vacant);
        self.len = 0;
    }

    /// Home-relative position of every entry, as `(home, index)` pairs
    pub(crate) fn entry_positions(&self) -> impl Iterator<Item = (usize, usize)> + '_
    where
        S: Fn(&K) -> u32,
    {
        let capacity = self.buckets.len();
        self.buckets.iter().enumerate().filter_map(move |(index, slot)| {
            slot.entry().map(|(key, _)| (reduce((self.hasher)(key), capacity), index))
        })
    }

    /// Raw bucket tags, in bucket order
    pub(crate) fn slot_states(&self) -> impl Iterator<Item = SlotState> + '_ {
        self.buckets.iter().map(Slot::state)
    }
}

/// Iterator over the entries of a [`ProbeTable`]
pub struct Iter<'t, 'a, K: ?Sized, V: ?Sized> {
    /// Remaining buckets
    slots: slice::Iter<'t, Slot<'a, K, V>>,
}

impl<K: ?Sized, V: ?Sized> fmt::Debug for Iter<'_, '_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter").field("remaining_buckets", &self.slots.len()).finish()
    }
}

impl<'a, K: ?Sized, V: ?Sized> Iterator for Iter<'_, 'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.slots.find_map(Slot::entry)
    }
}

#[cfg(test)]
#[allow(clippy::trivially_copy_pass_by_ref)]
mod tests {
    use super::*;

    fn identity(key: &u32) -> u32 {
        *key
    }

    fn always_one(_: &u32) -> u32 {
        1
    }

    fn always_zero(_: &u32) -> u32 {
        0
    }

    fn always_three(_: &u32) -> u32 {
        3
    }

    fn no_growth() -> TableConfig {
        TableConfig::default().with_load_factor_threshold(1.0)
    }

    fn states<K: ?Sized, V: ?Sized, S>(table: &ProbeTable<'_, K, V, S>) -> Vec<SlotState> {
        table.slot_states().collect()
    }

    use crate::slot::SlotState::{Deleted as D, Occupied as O, Vacant as E};

    #[test]
    fn test_create() {
        let table = ProbeTable::<u32, str, _>::new(4, identity);
        assert!(table.is_ok_and(|t| t.capacity() == 4 && t.is_empty() && states(&t) == [E; 4]));

        let table = ProbeTable::<u32, str, _>::new(4, identity);
        assert!(table.is_ok_and(|t| *t.config() == TableConfig::default()));

        let zero = ProbeTable::<u32, str, _>::new(0, identity);
        assert!(matches!(zero, Err(TableError::InvalidArgument(_))));

        let bad = ProbeTable::<u32, str, _>::with_config(
            4,
            identity,
            TableConfig::default().with_load_factor_threshold(0.0),
        );
        assert!(matches!(bad, Err(TableError::InvalidArgument(_))));
    }

    #[test]
    fn test_oversized_table_reports_allocation_failure() {
        let table = ProbeTable::<u32, str, _>::new(usize::MAX / 2, identity);
        assert!(matches!(
            table,
            Err(TableError::AllocationFailure { requested }) if requested == usize::MAX / 2
        ));
    }

    #[test]
    fn test_insert_and_get() -> Result<()> {
        let keys = [10_u32, 20, 30];
        let mut table = ProbeTable::new(16, identity)?;

        table.insert(&keys[0], "ten")?;
        table.insert(&keys[1], "twenty")?;
        table.insert(&keys[2], "thirty")?;

        assert_eq!(table.get(&keys[0]), Ok("ten"));
        assert_eq!(table.get(&keys[1]), Ok("twenty"));
        assert_eq!(table.get(&keys[2]), Ok("thirty"));
        assert_eq!(table.len(), 3);
        Ok(())
    }

    #[test]
    fn test_duplicate_key() -> Result<()> {
        let key = 5_u32;
        let mut table = ProbeTable::new(8, identity)?;

        table.insert(&key, "first")?;
        assert_eq!(table.insert(&key, "second"), Err(TableError::DuplicateKey));
        assert_eq!(table.get(&key), Ok("first"));
        assert_eq!(table.len(), 1);
        Ok(())
    }

    #[test]
    fn test_keys_compared_by_reference() -> Result<()> {
        let a = 5_u32;
        let b = 5_u32;
        let mut table = ProbeTable::new(8, identity)?;

        table.insert(&a, "a")?;
        table.insert(&b, "b")?;
        assert_eq!(table.get(&a), Ok("a"));
        assert_eq!(table.get(&b), Ok("b"));

        let probe = 5_u32;
        assert_eq!(table.get(&probe), Err(TableError::KeyNotFound));
        assert!(!table.contains_key(&probe));
        Ok(())
    }

    #[test]
    fn test_custom_key_eq() -> Result<()> {
        let a = 5_u32;
        let b = 5_u32;
        let mut table =
            ProbeTable::with_key_eq(8, identity, TableConfig::default(), |x: &u32, y: &u32| x == y)?;

        table.insert(&a, "a")?;
        assert_eq!(table.insert(&b, "b"), Err(TableError::DuplicateKey));
        assert_eq!(table.get(&b), Ok("a"));
        Ok(())
    }

    #[test]
    fn test_update() -> Result<()> {
        let key = 1_u32;
        let other = 2_u32;
        let mut table = ProbeTable::new(8, identity)?;

        table.insert(&key, "old")?;
        assert_eq!(table.update(&key, "new"), Ok("old"));
        assert_eq!(table.get(&key), Ok("new"));
        assert_eq!(table.update(&other, "x"), Err(TableError::KeyNotFound));
        assert_eq!(table.len(), 1);
        Ok(())
    }

    #[test]
    fn test_remove() -> Result<()> {
        let keys = [1_u32, 2];
        let value = String::from("one");
        let mut table = ProbeTable::<u32, String, _>::new(8, identity)?;

        table.insert(&keys[0], &value)?;
        table.insert(&keys[1], &value)?;

        let removed = table.remove(&keys[0])?;
        assert!(ptr::eq(removed, &value));
        assert_eq!(table.get(&keys[0]), Err(TableError::KeyNotFound));
        assert_eq!(table.remove(&keys[0]), Err(TableError::KeyNotFound));
        assert!(table.contains_key(&keys[1]));
        assert_eq!(table.len(), 1);
        Ok(())
    }

    #[test]
    fn test_tombstone_keeps_chain_reachable() -> Result<()> {
        let (a, b, c) = (100_u32, 200_u32, 300_u32);
        let mut table = ProbeTable::new(4, always_one)?;

        table.insert(&a, "A")?;
        table.insert(&b, "B")?;
        table.insert(&c, "C")?;
        // Third insert crossed 0.7 and doubled the table; 1 mod 8 keeps the chain at 1..=3.
        assert_eq!(table.capacity(), 8);
        assert_eq!(states(&table), [E, O, O, O, E, E, E, E]);

        assert_eq!(table.remove(&b), Ok("B"));
        assert_eq!(table.slot_state(2), Some(D));
        assert_eq!(table.get(&c), Ok("C"));
        assert_eq!(table.get(&a), Ok("A"));
        Ok(())
    }

    #[test]
    fn test_tombstone_collapses_before_vacancy() -> Result<()> {
        let (a, b, c) = (100_u32, 200_u32, 300_u32);
        let mut table = ProbeTable::new(4, always_one)?;
        table.insert(&a, "A")?;
        table.insert(&b, "B")?;
        table.insert(&c, "C")?;

        table.remove(&c)?;
        assert_eq!(table.slot_state(3), Some(E));
        table.remove(&b)?;
        assert_eq!(table.slot_state(2), Some(E));
        assert_eq!(states(&table), [E, O, E, E, E, E, E, E]);
        Ok(())
    }

    #[test]
    fn test_tombstone_collapses_backward_one_step() -> Result<()> {
        let (a, b, c) = (100_u32, 200_u32, 300_u32);
        let mut table = ProbeTable::new(4, always_one)?;
        table.insert(&a, "A")?;
        table.insert(&b, "B")?;
        table.insert(&c, "C")?;

        table.remove(&b)?;
        table.remove(&c)?;
        assert_eq!(states(&table), [E, O, E, E, E, E, E, E]);
        assert_eq!(table.get(&a), Ok("A"));
        Ok(())
    }

    #[test]
    fn test_backward_collapse_wraps() -> Result<()> {
        let (a, b) = (1_u32, 2_u32);
        let mut table = ProbeTable::with_config(4, always_three, no_growth())?;
        table.insert(&a, "A")?;
        table.insert(&b, "B")?;
        assert_eq!(states(&table), [O, E, E, O]);

        table.remove(&a)?;
        assert_eq!(states(&table), [O, E, E, D]);
        table.remove(&b)?;
        assert_eq!(states(&table), [E; 4]);
        Ok(())
    }

    #[test]
    fn test_tombstone_policies() -> Result<()> {
        let keys = [0_u32, 1, 2, 3, 4];

        let mut single = ProbeTable::with_config(8, always_zero, no_growth())?;
        let mut cascade = ProbeTable::with_config(
            8,
            always_zero,
            no_growth().with_tombstone_policy(TombstonePolicy::Cascade),
        )?;

        for table in [&mut single, &mut cascade] {
            for key in &keys {
                table.insert(key, "v")?;
            }
            for key in &keys[1..] {
                table.remove(key)?;
            }
        }

        assert_eq!(states(&single), [O, D, D, E, E, E, E, E]);
        assert_eq!(states(&cascade), [O, E, E, E, E, E, E, E]);
        assert_eq!(single.get(&keys[0]), Ok("v"));
        assert_eq!(cascade.get(&keys[0]), Ok("v"));
        Ok(())
    }

    #[test]
    fn test_duplicate_detected_past_tombstone() -> Result<()> {
        let (a, b, c) = (1_u32, 2_u32, 3_u32);
        let mut table = ProbeTable::with_config(8, always_zero, no_growth())?;
        table.insert(&a, "A")?;
        table.insert(&b, "B")?;

        table.remove(&a)?;
        assert_eq!(table.slot_state(0), Some(D));
        assert_eq!(table.insert(&b, "again"), Err(TableError::DuplicateKey));

        table.insert(&c, "C")?;
        assert_eq!(table.slot_state(0), Some(O));
        assert_eq!(table.get(&c), Ok("C"));
        assert_eq!(table.get(&b), Ok("B"));
        Ok(())
    }

    #[test]
    fn test_growth_on_load_factor() -> Result<()> {
        let keys = [0_u32, 1, 2, 3];
        let mut table = ProbeTable::new(4, identity)?;

        table.insert(&keys[0], "0")?;
        table.insert(&keys[1], "1")?;
        assert_eq!(table.capacity(), 4);
        table.insert(&keys[2], "2")?;
        assert_eq!(table.capacity(), 8);

        assert_eq!(table.get(&keys[0]), Ok("0"));
        assert_eq!(table.get(&keys[1]), Ok("1"));
        assert_eq!(table.get(&keys[2]), Ok("2"));
        table.insert(&keys[3], "3")?;
        assert_eq!(table.get(&keys[3]), Ok("3"));
        assert!(table.load_factor() <= 0.7);
        Ok(())
    }

    #[test]
    fn test_failed_growth_keeps_insert() -> Result<()> {
        let keys = [0_u32, 1, 2, 3, 4];
        let config = TableConfig::default().with_max_capacity(4);
        let mut table = ProbeTable::with_config(4, identity, config)?;

        table.insert(&keys[0], "0")?;
        table.insert(&keys[1], "1")?;
        table.insert(&keys[2], "2")?;
        assert_eq!(table.capacity(), 4);
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(&keys[2]), Ok("2"));

        table.insert(&keys[3], "3")?;
        assert_eq!(
            table.insert(&keys[4], "4"),
            Err(TableError::CapacityExhausted { capacity: 4 })
        );
        assert!(!table.contains_key(&keys[4]));
        assert_eq!(table.len(), 4);
        Ok(())
    }

    #[test]
    fn test_full_table_reuses_tombstone() -> Result<()> {
        let keys = [0_u32, 1, 2, 3, 4];
        let mut table = ProbeTable::with_config(4, identity, no_growth())?;
        for key in &keys[..4] {
            table.insert(key, "v")?;
        }

        table.remove(&keys[1])?;
        assert_eq!(states(&table), [O, D, O, O]);
        assert_eq!(table.get(&keys[4]), Err(TableError::KeyNotFound));

        table.insert(&keys[4], "four")?;
        assert_eq!(states(&table), [O; 4]);
        assert_eq!(table.get(&keys[4]), Ok("four"));
        Ok(())
    }

    #[test]
    fn test_resize_drops_tombstones() -> Result<()> {
        let keys = [0_u32, 1, 2, 3];
        let mut table = ProbeTable::with_config(4, always_zero, no_growth())?;
        for key in &keys {
            table.insert(key, "v")?;
        }
        table.remove(&keys[1])?;
        assert_eq!(states(&table), [O, D, O, O]);

        table.resize()?;
        assert_eq!(table.capacity(), 8);
        assert_eq!(table.len(), 3);
        assert_eq!(states(&table), [O, O, O, E, E, E, E, E]);
        for key in [&keys[0], &keys[2], &keys[3]] {
            assert!(table.contains_key(key));
        }
        Ok(())
    }

    #[test]
    fn test_resize_over_ceiling_is_harmless() -> Result<()> {
        let key = 3_u32;
        let mut table =
            ProbeTable::with_config(2, identity, TableConfig::default().with_max_capacity(3))?;
        table.insert(&key, "v")?;

        assert_eq!(table.resize(), Err(TableError::AllocationFailure { requested: 4 }));
        assert_eq!(table.capacity(), 2);
        assert_eq!(table.get(&key), Ok("v"));
        Ok(())
    }

    #[test]
    fn test_single_bucket_table() -> Result<()> {
        let keys = [7_u32, 8];
        let mut table = ProbeTable::new(1, identity)?;

        table.insert(&keys[0], "a")?;
        assert_eq!(table.capacity(), 2);
        table.insert(&keys[1], "b")?;
        assert_eq!(table.capacity(), 4);
        assert_eq!(table.remove(&keys[0]), Ok("a"));
        assert_eq!(table.get(&keys[1]), Ok("b"));
        Ok(())
    }

    #[test]
    fn test_contains_value() -> Result<()> {
        let key = 1_u32;
        let value = String::from("payload");
        let twin = String::from("payload");
        let mut table = ProbeTable::<u32, String, _>::new(8, identity)?;

        table.insert(&key, &value)?;
        assert!(table.contains_value(&value));
        assert!(!table.contains_value(&twin));
        Ok(())
    }

    #[test]
    fn test_iter_and_clear() -> Result<()> {
        let keys = [1_u32, 2, 3];
        let values = [10_u32, 20, 30];
        let mut table = ProbeTable::<u32, u32, _>::new(16, identity)?;
        for (key, value) in keys.iter().zip(&values) {
            table.insert(key, value)?;
        }

        let sum: u32 = table.iter().map(|(_, value)| *value).sum();
        assert_eq!(sum, 60);
        assert_eq!(table.iter().count(), 3);

        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.capacity(), 16);
        assert_eq!(table.get(&keys[0]), Err(TableError::KeyNotFound));
        assert_eq!(table.iter().count(), 0);
        Ok(())
    }

    #[test]
    fn test_unsized_payloads() -> Result<()> {
        let key: &str = "process-17";
        let value: &[u8] = &[1, 2, 3];
        let mut table = ProbeTable::<str, [u8], _>::new(8, |k: &str| {
            k.bytes().fold(0_u32, |acc, b| acc.wrapping_mul(31).wrapping_add(u32::from(b)))
        })?;

        table.insert(key, value)?;
        assert_eq!(table.get(key), Ok(value));
        Ok(())
    }

    #[test]
    fn test_destroy_leaves_payloads() -> Result<()> {
        let key = 1_u32;
        let value = String::from("still here");
        let mut table = ProbeTable::<u32, String, _>::new(4, identity)?;
        table.insert(&key, &value)?;

        table.destroy();
        assert_eq!(value, "still here");
        Ok(())
    }
}
