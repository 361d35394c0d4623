//! Filename resolution for the `.dir`/`.pak` pair.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Extension of the path table file.
pub const DIR_EXTENSION: &str = "dir";
/// Extension of the content container file.
pub const PAK_EXTENSION: &str = "pak";

/// The three filenames that make up one archive.
///
/// `base` is the shared stem of the two files and the default extraction
/// directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivePaths {
    dir: PathBuf,
    base: PathBuf,
    pak: PathBuf,
}

impl ArchivePaths {
    /// Resolve from any combination of names.
    ///
    /// Explicit names are kept as given. A missing base is derived from the
    /// `.dir` name, else from the `.pak` name, by stripping the extension;
    /// missing file names are the base plus their fixed suffix.
    pub fn new(dir: Option<PathBuf>, base: Option<PathBuf>, pak: Option<PathBuf>) -> Result<Self> {
        let base = match (base, &dir, &pak) {
            (Some(base), _, _) => base,
            (None, Some(dir), _) => without_extension(dir),
            (None, None, Some(pak)) => without_extension(pak),
            (None, None, None) => return Err(Error::Usage),
        };
        let dir = dir.unwrap_or_else(|| with_suffix(&base, DIR_EXTENSION));
        let pak = pak.unwrap_or_else(|| with_suffix(&base, PAK_EXTENSION));

        Ok(Self { dir, base, pak })
    }

    /// Derive both files from a base name.
    pub fn from_base<P: Into<PathBuf>>(base: P) -> Self {
        let base = base.into();
        Self {
            dir: with_suffix(&base, DIR_EXTENSION),
            pak: with_suffix(&base, PAK_EXTENSION),
            base,
        }
    }

    /// Derive the base and container name from a `.dir` file.
    pub fn from_dir<P: Into<PathBuf>>(dir: P) -> Self {
        let dir = dir.into();
        let base = without_extension(&dir);
        Self {
            pak: with_suffix(&base, PAK_EXTENSION),
            dir,
            base,
        }
    }

    /// Derive the base and table name from a `.pak` file.
    pub fn from_pak<P: Into<PathBuf>>(pak: P) -> Self {
        let pak = pak.into();
        let base = without_extension(&pak);
        Self {
            dir: with_suffix(&base, DIR_EXTENSION),
            pak,
            base,
        }
    }

    /// Pick the right constructor from the extension (case-insensitive).
    ///
    /// Anything other than `.pak` or `.dir` is taken as a base name.
    pub fn resolve<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some(PAK_EXTENSION) => Self::from_pak(path),
            Some(DIR_EXTENSION) => Self::from_dir(path),
            _ => Self::from_base(path),
        }
    }

    /// Path table file.
    #[inline]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Shared stem, also the default extraction directory.
    #[inline]
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Content container file.
    #[inline]
    pub fn pak(&self) -> &Path {
        &self.pak
    }
}

fn without_extension(path: &Path) -> PathBuf {
    path.with_extension("")
}

/// Append `.suffix` to the whole name, keeping any dots already in it.
fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}
