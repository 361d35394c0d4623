//! `.dir`/`.pak` archive reader.
//!
//! The path table is decoded once when the archive is opened and never
//! changes afterward. Every read opens the container on its own, so reads of
//! different entries are independent of each other.

use std::fs::{self, File};
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use dirpak_dir::{DirEntry, DirTable};

use crate::content::decode_file_content;
use crate::header::{decode_header, EntryHeader, RawEntryHeader};
use crate::paths::ArchivePaths;
use crate::{Error, Result};

/// An opened archive: resolved filenames plus the decoded path table.
#[derive(Debug, Clone)]
pub struct PakArchive {
    paths: ArchivePaths,
    table: DirTable,
}

impl PakArchive {
    /// Open an archive, decoding its `.dir` table.
    pub fn open(paths: ArchivePaths) -> Result<Self> {
        let table = DirTable::open(paths.dir())?;
        log::info!(
            "opened {} ({} entries, container {})",
            paths.dir().display(),
            table.len(),
            paths.pak().display()
        );
        Ok(Self { paths, table })
    }

    /// Open from a `.dir`, `.pak` or base name.
    pub fn open_path<P: Into<PathBuf>>(path: P) -> Result<Self> {
        Self::open(ArchivePaths::resolve(path))
    }

    /// Assemble an archive from a table that was decoded elsewhere.
    pub fn from_parts(paths: ArchivePaths, table: DirTable) -> Self {
        Self { paths, table }
    }

    /// Resolved filenames.
    #[inline]
    pub fn paths(&self) -> &ArchivePaths {
        &self.paths
    }

    /// The decoded path table.
    #[inline]
    pub fn table(&self) -> &DirTable {
        &self.table
    }

    /// Get the number of entries.
    #[inline]
    pub fn entry_count(&self) -> usize {
        self.table.len()
    }

    /// Iterate entries in table order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &DirEntry> + '_ {
        self.table.iter()
    }

    /// Find an entry by its exact path.
    #[inline]
    pub fn get(&self, path: &str) -> Option<&DirEntry> {
        self.table.get(path)
    }

    /// Read and decode the entry at `path`.
    pub fn read(&self, path: &str) -> Result<Vec<u8>> {
        let entry = self
            .get(path)
            .ok_or_else(|| Error::EntryNotFound(path.to_owned()))?;
        self.read_entry(entry)
    }

    /// Read and decode an entry.
    pub fn read_entry(&self, entry: &DirEntry) -> Result<Vec<u8>> {
        let data = self.read_raw(entry)?;
        decode_file_content(&data)
    }

    /// Read an entry's bytes from the container without decoding them.
    pub fn read_raw(&self, entry: &DirEntry) -> Result<Vec<u8>> {
        let mut file = File::open(self.paths.pak())?;
        read_slice(&mut file, entry)
    }

    /// Inspect an entry's payload header, reading at most its first 8 bytes.
    pub fn header(&self, entry: &DirEntry) -> Result<EntryHeader> {
        let mut file = File::open(self.paths.pak())?;
        let head_len = entry.length().min(RawEntryHeader::SIZE as u32);
        let head = read_range(&mut file, entry, head_len)?;
        decode_header(&head)
    }

    /// Decode the entry at `path` into `dest`, creating parent directories.
    pub fn extract<P: AsRef<Path>>(&self, path: &str, dest: P) -> Result<()> {
        let entry = self
            .get(path)
            .ok_or_else(|| Error::EntryNotFound(path.to_owned()))?;
        self.extract_entry(entry, dest.as_ref())
    }

    /// Decode an entry into `dest`, creating parent directories.
    pub fn extract_entry(&self, entry: &DirEntry, dest: &Path) -> Result<()> {
        let data = self.read_entry(entry)?;
        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            // Succeeds when the directory already exists or another thread
            // creates it concurrently.
            fs::create_dir_all(parent)?;
        }
        fs::write(dest, data)?;
        Ok(())
    }
}

/// Read an entry's full byte range from a seekable container.
pub fn read_slice<R: Read + Seek>(reader: &mut R, entry: &DirEntry) -> Result<Vec<u8>> {
    read_range(reader, entry, entry.length())
}

/// Read the first `length` bytes of an entry after checking that the whole
/// entry lies inside the container.
fn read_range<R: Read + Seek>(reader: &mut R, entry: &DirEntry, length: u32) -> Result<Vec<u8>> {
    let container_len = reader.seek(SeekFrom::End(0))?;
    if entry.end() > container_len {
        return Err(Error::EntryOutOfBounds {
            path: entry.path().to_owned(),
            offset: u64::from(entry.offset()),
            end: entry.end(),
            container_len,
        });
    }

    reader.seek(SeekFrom::Start(u64::from(entry.offset())))?;
    let mut data = vec![0u8; length as usize];
    reader.read_exact(&mut data)?;
    Ok(data)
}
