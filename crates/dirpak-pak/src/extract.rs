//! Batch extraction.

use std::path::{Component, Path, PathBuf};

use dirpak_dir::DirEntry;

use crate::archive::PakArchive;
use crate::{Error, Result};

/// One successfully extracted file.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Extracted {
    /// Path of the entry inside the archive.
    pub entry: String,
    /// File that was written.
    pub dest: PathBuf,
}

/// Outcome of [`PakArchive::extract_all_isolated`].
#[derive(Debug, Default)]
pub struct ExtractReport {
    /// Files written, in extraction order.
    pub extracted: Vec<Extracted>,
    /// Entries that failed, with their errors.
    pub failures: Vec<(String, Error)>,
}

impl ExtractReport {
    /// Whether every entry was extracted.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Where an entry lands under `root`.
///
/// Entry paths are relative; absolute paths and `..` components are
/// rejected so nothing is written outside `root`.
pub fn destination_for(root: &Path, entry: &DirEntry) -> Result<PathBuf> {
    let relative = entry.output_path();
    let contained = relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));

    if !contained || relative.as_os_str().is_empty() {
        return Err(Error::UnsafePath(entry.path().to_owned()));
    }
    Ok(root.join(relative))
}

/// Lazy extraction of every entry, yielding one record per written file.
///
/// Iteration stops after the first failure.
pub struct ExtractAll<'a> {
    archive: &'a PakArchive,
    root: PathBuf,
    entries: std::vec::IntoIter<&'a DirEntry>,
    total: usize,
    done: usize,
    failed: bool,
}

impl<'a> ExtractAll<'a> {
    /// Number of entries this run covers.
    #[inline]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Destination root.
    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Iterator for ExtractAll<'_> {
    type Item = Result<Extracted>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let entry = self.entries.next()?;
        self.done += 1;

        let result = self.archive.extract_into(entry, &self.root);
        match &result {
            Ok(extracted) => log::debug!(
                "extracting {}/{} '{}' into '{}'",
                self.done,
                self.total,
                extracted.entry,
                extracted.dest.display()
            ),
            Err(e) => {
                log::debug!("extracting {}/{} '{}' failed: {}", self.done, self.total, entry.path(), e);
                self.failed = true;
            }
        }
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            (0, Some(0))
        } else {
            (0, Some(self.entries.len()))
        }
    }
}

impl PakArchive {
    /// Extract every entry lazily.
    ///
    /// `root` defaults to the archive base name. With `sorted`, entries are
    /// visited in lexicographic path order, otherwise in table order.
    pub fn extract_all_iter(&self, root: Option<&Path>, sorted: bool) -> ExtractAll<'_> {
        let entries = self.batch_entries(sorted);
        ExtractAll {
            archive: self,
            root: self.batch_root(root),
            total: entries.len(),
            entries: entries.into_iter(),
            done: 0,
            failed: false,
        }
    }

    /// Extract every entry, stopping at the first failure.
    pub fn extract_all(&self, root: Option<&Path>, sorted: bool) -> Result<Vec<Extracted>> {
        self.extract_all_iter(root, sorted).collect()
    }

    /// Extract every entry, carrying on past failures.
    pub fn extract_all_isolated(&self, root: Option<&Path>, sorted: bool) -> ExtractReport {
        let root = self.batch_root(root);
        let mut report = ExtractReport::default();

        for entry in self.batch_entries(sorted) {
            match self.extract_into(entry, &root) {
                Ok(extracted) => report.extracted.push(extracted),
                Err(e) => {
                    log::warn!("skipping '{}': {}", entry.path(), e);
                    report.failures.push((entry.path().to_owned(), e));
                }
            }
        }
        report
    }

    /// Extract every entry on the rayon pool, stopping at the first failure.
    ///
    /// Records come back in the same order as [`extract_all`](Self::extract_all).
    #[cfg(feature = "parallel")]
    pub fn extract_all_parallel(&self, root: Option<&Path>, sorted: bool) -> Result<Vec<Extracted>> {
        use rayon::prelude::*;

        let root = self.batch_root(root);
        self.batch_entries(sorted)
            .par_iter()
            .map(|entry| self.extract_into(entry, &root))
            .collect()
    }

    fn batch_entries(&self, sorted: bool) -> Vec<&DirEntry> {
        if sorted {
            self.table().sorted()
        } else {
            self.iter().collect()
        }
    }

    fn batch_root(&self, root: Option<&Path>) -> PathBuf {
        root.unwrap_or_else(|| self.paths().base()).to_path_buf()
    }

    /// Extract one entry under `root` and describe the result.
    pub(crate) fn extract_into(&self, entry: &DirEntry, root: &Path) -> Result<Extracted> {
        let dest = destination_for(root, entry)?;
        match self.extract_entry(entry, &dest) {
            Ok(()) => Ok(Extracted {
                entry: entry.path().to_owned(),
                dest,
            }),
            Err(source) => Err(Error::Extract {
                entry: entry.path().to_owned(),
                dest,
                source: Box::new(source),
            }),
        }
    }
}
