//! Utility functions and traits for `ProbeTable`

use crate::{ProbeTable, error::Result};

/// Extension trait providing collected views of a table
pub trait TableExtensions<'a, K: ?Sized, V: ?Sized> {
    /// Returns the key references, in bucket order
    fn keys(&self) -> Vec<&'a K>;

    /// Returns the value references, in bucket order
    fn values(&self) -> Vec<&'a V>;
}

impl<'a, K: ?Sized, V: ?Sized, S> TableExtensions<'a, K, V> for ProbeTable<'a, K, V, S> {
    fn keys(&self) -> Vec<&'a K> {
        self.iter().map(|(k, _)| k).collect()
    }

    fn values(&self) -> Vec<&'a V> {
        self.iter().map(|(_, v)| v).collect()
    }
}

/// Builds a table from borrowed key-value pairs.
///
/// # Errors
///
/// Fails on the first pair that cannot be inserted, or if the table cannot be created.
pub fn from_pairs<'a, K, V, S, I>(capacity: usize, hasher: S, pairs: I) -> Result<ProbeTable<'a, K, V, S>>
where
    K: ?Sized + 'a,
    V: ?Sized + 'a,
    S: Fn(&K) -> u32,
    I: IntoIterator<Item = (&'a K, &'a V)>,
{
    let mut table = ProbeTable::new(capacity, hasher)?;

    for (key, value) in pairs {
        table.insert(key, value)?;
    }

    Ok(table)
}
