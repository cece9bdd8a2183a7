use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

use crate::domain::entry::ProvisioningEntry;
use crate::domain::value_objects::ConnectionKey;

/// Insertion-ordered collection of entries, at most one per [`ConnectionKey`].
///
/// Display order is the order entries were first inserted; the key index only
/// serves lookups. Serialises as a plain sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntrySet {
    entries: Vec<ProvisioningEntry>,
    index: BTreeMap<ConnectionKey, usize>,
}

impl EntrySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &ConnectionKey) -> bool {
        self.index.contains_key(key)
    }

    pub fn get(&self, key: &ConnectionKey) -> Option<&ProvisioningEntry> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    pub(crate) fn get_mut(&mut self, key: &ConnectionKey) -> Option<&mut ProvisioningEntry> {
        match self.index.get(key) {
            Some(&i) => Some(&mut self.entries[i]),
            None => None,
        }
    }

    /// Append `entry` unless its key is already present.
    ///
    /// Returns `false` (and drops `entry`) on a duplicate: the first
    /// occurrence always wins.
    pub fn insert(&mut self, entry: ProvisioningEntry) -> bool {
        if self.index.contains_key(entry.key()) {
            return false;
        }
        self.index.insert(entry.key().clone(), self.entries.len());
        self.entries.push(entry);
        true
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProvisioningEntry> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &ConnectionKey> {
        self.entries.iter().map(|e| e.key())
    }

    pub fn as_slice(&self) -> &[ProvisioningEntry] {
        &self.entries
    }
}

impl FromIterator<ProvisioningEntry> for EntrySet {
    /// First occurrence of each key wins.
    fn from_iter<I: IntoIterator<Item = ProvisioningEntry>>(iter: I) -> Self {
        let mut set = EntrySet::new();
        for entry in iter {
            set.insert(entry);
        }
        set
    }
}

impl<'a> IntoIterator for &'a EntrySet {
    type Item = &'a ProvisioningEntry;
    type IntoIter = std::slice::Iter<'a, ProvisioningEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for EntrySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}
