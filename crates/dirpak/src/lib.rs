//! dirpak - reader and extractor for `.dir`/`.pak` archives.
//!
//! This crate provides a unified interface to the dirpak crates.
//!
//! # Crates
//!
//! - [`dirpak_common`] - Bounds-checked binary reading
//! - [`dirpak_dir`] - Trie-encoded `.dir` path table decoding
//! - [`dirpak_pak`] - Payload decoding and the archive reader
//!
//! # Example
//!
//! ```no_run
//! use dirpak::prelude::*;
//!
//! let archive = PakArchive::open(ArchivePaths::from_base("Steamcarmain_null"))?;
//!
//! for record in archive.extract_all_iter(None, true) {
//!     let record = record?;
//!     if record.entry.ends_with(".tga") {
//!         // Hand the file to an image converter.
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use dirpak_common as common;
pub use dirpak_dir as dir;
pub use dirpak_pak as pak;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use dirpak_common::BinaryReader;
    pub use dirpak_dir::{DirEntry, DirTable};
    pub use dirpak_pak::{
        decode_file_content, ArchivePaths, EntryHeader, ErrorKind, ExtractReport, Extracted,
        PakArchive,
    };
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
