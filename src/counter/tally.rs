//! Zero-initialized count tables keyed by lane (or lane pair) and type.

use std::collections::BTreeMap;

use crate::model::{TypeCode, TypeDictionary};

/// Counts per `(key, type)` pair.
///
/// The key space is fixed at construction: the full cross product of the
/// supplied keys and the dictionary's type codes, every cell starting at
/// zero. Cells only ever go up, except through [`TallyTable::reset`].
/// Increments against a cell outside the key space are refused rather than
/// inserted, so the key space can never drift at runtime.
///
/// Crossings by objects whose type is not in the dictionary are tracked per
/// key in a separate `unclassified` column and never touch the typed cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TallyTable<K: Ord + Copy> {
    cells: BTreeMap<(K, TypeCode), u64>,
    unclassified: BTreeMap<K, u64>,
}

impl<K: Ord + Copy> Default for TallyTable<K> {
    fn default() -> Self {
        Self {
            cells: BTreeMap::new(),
            unclassified: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Copy> TallyTable<K> {
    /// Builds the zeroed cross product of `keys` and the dictionary's codes.
    pub fn new(keys: impl IntoIterator<Item = K>, types: &TypeDictionary) -> Self {
        let mut table = Self::default();
        for key in keys {
            table.unclassified.insert(key, 0);
            for code in types.codes() {
                table.cells.insert((key, code), 0);
            }
        }
        table
    }

    /// Adds one to the `(key, code)` cell.
    ///
    /// Returns false, leaving the table untouched, if the cell is not part of
    /// the key space.
    pub fn increment(&mut self, key: K, code: TypeCode) -> bool {
        match self.cells.get_mut(&(key, code)) {
            Some(count) => {
                *count += 1;
                true
            }
            None => false,
        }
    }

    /// Adds one to the unclassified column of `key`.
    ///
    /// Returns false if `key` is not part of the key space.
    pub fn record_unclassified(&mut self, key: K) -> bool {
        match self.unclassified.get_mut(&key) {
            Some(count) => {
                *count += 1;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, key: K, code: TypeCode) -> Option<u64> {
        self.cells.get(&(key, code)).copied()
    }

    pub fn unclassified(&self, key: K) -> Option<u64> {
        self.unclassified.get(&key).copied()
    }

    /// Sum of all typed cells.
    pub fn total(&self) -> u64 {
        self.cells.values().sum()
    }

    /// Sum of the unclassified column.
    pub fn total_unclassified(&self) -> u64 {
        self.unclassified.values().sum()
    }

    /// Sets every cell, typed and unclassified, back to zero.
    pub fn reset(&mut self) {
        self.cells.values_mut().for_each(|count| *count = 0);
        self.unclassified.values_mut().for_each(|count| *count = 0);
    }

    /// `(key, code, count)` in key-then-code order.
    pub fn iter(&self) -> impl Iterator<Item = (K, TypeCode, u64)> + '_ {
        self.cells
            .iter()
            .map(|(&(key, code), &count)| (key, code, count))
    }

    /// The configured keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.unclassified.keys().copied()
    }

    /// Number of typed cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
