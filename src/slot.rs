//! Tri-state bucket storage

use std::fmt;

/// The tag of a single bucket, as observed from outside the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// Never used, or reclaimed; ends a probe scan
    Vacant,
    /// Holds one live entry
    Occupied,
    /// Tombstone left by a removal; probe scans continue past it
    Deleted,
}

/// A bucket of the table.
///
/// Payloads are borrowed, so a slot is always `Copy` no matter what `K` and `V` are.
pub(crate) enum Slot<'a, K: ?Sized, V: ?Sized> {
    /// Never used, or reclaimed
    Vacant,
    /// A live entry
    Occupied {
        /// The key reference, compared by identity
        key: &'a K,
        /// The value reference handed back by `get`, `update` and `remove`
        value: &'a V,
    },
    /// Tombstone
    Deleted,
}

impl<K: ?Sized, V: ?Sized> Clone for Slot<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: ?Sized, V: ?Sized> Copy for Slot<'_, K, V> {}

impl<K: ?Sized, V: ?Sized> fmt::Debug for Slot<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.state(), f)
    }
}

impl<'a, K: ?Sized, V: ?Sized> Slot<'a, K, V> {
    /// Returns the tag of this slot
    pub(crate) fn state(&self) -> SlotState {
        match self {
            Self::Vacant => SlotState::Vacant,
            Self::Occupied { .. } => SlotState::Occupied,
            Self::Deleted => SlotState::Deleted,
        }
    }

    /// Returns the entry if the slot is occupied
    pub(crate) fn entry(&self) -> Option<(&'a K, &'a V)> {
        match *self {
            Self::Occupied { key, value } => Some((key, value)),
            Self::Vacant | Self::Deleted => None,
        }
    }

    /// Returns true for `Vacant`
    pub(crate) fn is_vacant(&self) -> bool {
        matches!(self, Self::Vacant)
    }

    /// Returns true for `Deleted`
    pub(crate) fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted)
    }
}
