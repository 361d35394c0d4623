//! Decoder for the `.dir` path table.
//!
//! A `.dir` file maps every file path in an archive to a byte range in the
//! companion `.pak` container. Paths are stored as a prefix-sharing trie
//! flattened into two-byte `(byte, command)` records; see [`NodeCommand`]
//! for the four node types.
//!
//! # Example
//!
//! ```no_run
//! use dirpak_dir::DirTable;
//!
//! let table = DirTable::open("Steamcarmain_null.dir")?;
//!
//! for entry in table.iter() {
//!     println!("{} @ {:#x} ({} bytes)", entry.path(), entry.offset(), entry.length());
//! }
//! # Ok::<(), dirpak_dir::Error>(())
//! ```

mod decoder;
mod entry;
mod error;
mod table;

pub use decoder::{parse_dir_entries, NodeCommand};
pub use entry::DirEntry;
pub use error::{Error, Result};
pub use table::DirTable;
