//! Reader for `.dir`/`.pak` archives.
//!
//! An archive is a pair of files sharing a base name:
//!
//! - `<base>.dir` - a trie-encoded table mapping paths to byte ranges
//!   (decoded by [`dirpak_dir`])
//! - `<base>.pak` - the container holding each entry's payload
//!
//! A payload is either raw, with a one-byte prefix before the content, or a
//! zlib stream behind an 8-byte header whose size field is XOR-obfuscated
//! with a key derived from the header magic.
//!
//! # Example
//!
//! ```no_run
//! use dirpak_pak::PakArchive;
//!
//! let archive = PakArchive::open_path("Steamcarmain_null.pak")?;
//!
//! for entry in archive.iter() {
//!     println!("{}: {} bytes", entry.path(), entry.length());
//! }
//!
//! // Read a specific file
//! let data = archive.read("gfx/logo.tga")?;
//!
//! // Or everything, sorted, into ./Steamcarmain_null
//! for record in archive.extract_all_iter(None, true) {
//!     let record = record?;
//!     println!("{} -> {}", record.entry, record.dest.display());
//! }
//! # Ok::<(), dirpak_pak::Error>(())
//! ```

mod archive;
mod content;
mod decompress;
mod error;
mod extract;
mod header;
mod paths;

pub use archive::{read_slice, PakArchive};
pub use content::decode_file_content;
pub use error::{Error, ErrorKind, Result};
pub use extract::{destination_for, ExtractAll, ExtractReport, Extracted};
pub use header::{
    decode_header, fold_magic, xor_key_from_magic, EntryHeader, RawEntryHeader, COMPRESSED_MAGIC,
};
pub use paths::{ArchivePaths, DIR_EXTENSION, PAK_EXTENSION};

pub use dirpak_dir::{DirEntry, DirTable};
