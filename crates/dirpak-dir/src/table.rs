//! The decoded path table.

use std::fs;
use std::io::Read;
use std::path::Path;

use hashbrown::HashMap as FastHashMap;

use crate::decoder::parse_dir_entries;
use crate::{DirEntry, Result};

/// Ordered mapping from path to [`DirEntry`].
///
/// Iteration follows insertion order. When the same path is inserted twice,
/// the later entry replaces the earlier one in place, so the path keeps the
/// position of its first appearance.
#[derive(Debug, Clone, Default)]
pub struct DirTable {
    entries: Vec<DirEntry>,
    index: FastHashMap<String, usize>,
}

impl DirTable {
    /// Decode a table from an in-memory `.dir` stream.
    pub fn parse(data: &[u8]) -> Result<Self> {
        Ok(Self::from_entries(parse_dir_entries(data)?))
    }

    /// Decode a table from a readable stream.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::parse(&data)
    }

    /// Read and decode a `.dir` file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        let table = Self::parse(&data)?;
        log::debug!(
            "decoded {} entries from {} ({} bytes)",
            table.len(),
            path.display(),
            data.len()
        );
        Ok(table)
    }

    /// Build a table from entries in decode order.
    pub fn from_entries<I: IntoIterator<Item = DirEntry>>(entries: I) -> Self {
        let mut table = Self::default();
        for entry in entries {
            table.insert(entry);
        }
        table
    }

    fn insert(&mut self, entry: DirEntry) {
        match self.index.get(entry.path()) {
            Some(&slot) => self.entries[slot] = entry,
            None => {
                self.index.insert(entry.path().to_owned(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    /// Number of distinct paths.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by its exact path.
    pub fn get(&self, path: &str) -> Option<&DirEntry> {
        self.index.get(path).map(|&slot| &self.entries[slot])
    }

    /// Whether an entry exists for the exact path.
    pub fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    /// Iterate entries in insertion order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, DirEntry> {
        self.entries.iter()
    }

    /// Iterate paths in insertion order.
    pub fn paths(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(DirEntry::path)
    }

    /// Entries ordered lexicographically by path.
    pub fn sorted(&self) -> Vec<&DirEntry> {
        let mut entries: Vec<&DirEntry> = self.entries.iter().collect();
        entries.sort_unstable_by(|a, b| a.path().cmp(b.path()));
        entries
    }
}

impl<'a> IntoIterator for &'a DirTable {
    type Item = &'a DirEntry;
    type IntoIter = std::slice::Iter<'a, DirEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
