//! # Probe Table
//!
//! An open-addressing hash table mapping borrowed key references to borrowed value references.
//!
//! - Collisions are resolved by linear probing (step 1, wrapping at the end of the array).
//! - Removal leaves a tombstone so entries placed past it stay reachable; tombstones directly
//!   followed by a vacant bucket are reclaimed on the spot.
//! - After an insert pushes the load factor above 0.7 the bucket array doubles and every
//!   entry is rehashed.
//!
//! Keys are compared by **reference identity**: the table answers "is this exact key object
//! stored?", not "is an equal key stored?". The table never owns its payloads; it borrows
//! them for `'a` and hands them back on `update` and `remove`. The hash function is supplied
//! by the caller.
//!
//! ## Basic Usage
//!
//! ```rust
//! use probe_table::{ProbeTable, TableError};
//!
//! fn pid_hash(pid: &u32) -> u32 {
//!     pid.wrapping_mul(0x9E37_79B9)
//! }
//!
//! let init = 1_u32;
//! let shell = 42_u32;
//! let mut threads = ProbeTable::new(8, pid_hash)?;
//!
//! // Insert entries
//! threads.insert(&init, "init")?;
//! threads.insert(&shell, "sh")?;
//! assert_eq!(threads.insert(&shell, "bash"), Err(TableError::DuplicateKey));
//!
//! // Update and retrieve
//! assert_eq!(threads.update(&shell, "bash")?, "sh");
//! assert_eq!(threads.get(&shell)?, "bash");
//!
//! // A value-equal key at another address is a different key
//! let other = 42_u32;
//! assert!(!threads.contains_key(&other));
//!
//! // Remove hands the value back
//! assert_eq!(threads.remove(&init)?, "init");
//! assert_eq!(threads.get(&init), Err(TableError::KeyNotFound));
//! # Ok::<(), TableError>(())
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use probe_table::{ProbeTable, TableConfig, TombstonePolicy};
//!
//! let config = TableConfig::default()
//!     .with_load_factor_threshold(0.5)
//!     .with_tombstone_policy(TombstonePolicy::Cascade)
//!     .with_max_capacity(1 << 16);
//! let table = ProbeTable::<u64, str, _>::with_config(64, |k: &u64| *k as u32, config)?;
//! assert_eq!(table.capacity(), 64);
//! # Ok::<(), probe_table::TableError>(())
//! ```

/// Table configuration
mod config;
/// Error type
mod error;
/// Bucket storage
mod slot;
/// Occupancy and probe-length statistics
mod stats;
/// The open-addressing table
mod table;
/// Utility functions and traits for the table
mod utils;

pub use config::{DEFAULT_LOAD_FACTOR, TableConfig, TombstonePolicy};
pub use error::{Result, TableError};
pub use slot::SlotState;
pub use stats::TableStats;
pub use table::{Iter, ProbeTable};
pub use utils::{TableExtensions, from_pairs};
