//! Error type shared by every `ProbeTable` operation

use thiserror::Error;

/// Failure kinds reported by the table.
///
/// Every operation reports failure through this type and leaves the table unchanged, with one
/// exception: an insert whose triggered growth fails still succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TableError {
    /// A construction parameter or configuration value is out of range
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// The key (by identity) is already stored; use `update` to overwrite
    #[error("key is already present in the table")]
    DuplicateKey,
    /// The key (by identity) is not stored
    #[error("key is not present in the table")]
    KeyNotFound,
    /// A full probe cycle found neither the key nor a free slot
    #[error("probed all {capacity} buckets without finding a free slot")]
    CapacityExhausted {
        /// Number of buckets scanned
        capacity: usize,
    },
    /// The bucket array could not be allocated
    #[error("could not allocate a bucket array of {requested} slots")]
    AllocationFailure {
        /// Number of slots the failed allocation asked for
        requested: usize,
    },
}

/// Result alias used throughout the crate
pub type Result<T, E = TableError> = std::result::Result<T, E>;
