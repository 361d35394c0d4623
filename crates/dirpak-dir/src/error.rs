//! Error types for the dir table crate.

use thiserror::Error;

/// Errors that can occur while decoding a dir table.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A record carried a command byte outside the four known node types.
    #[error("unknown dir tree node type {command:#04x} at offset {offset}")]
    UnknownCommand { command: u8, offset: usize },

    /// A finalized path contained a byte outside 7-bit ASCII.
    ///
    /// `trailer_offset` is where the entry's offset/length trailer starts,
    /// directly after the record that finalized the path.
    #[error("non-ASCII byte {byte:#04x} in path {path:?} finalized before offset {trailer_offset}")]
    NonAsciiPath {
        path: String,
        byte: u8,
        trailer_offset: usize,
    },

    /// Input ran out before the tree was closed.
    #[error("dir table truncated at offset {offset} with {open_branches} open branch(es)")]
    Truncated { offset: usize, open_branches: usize },
}

/// Result type for dir table operations.
pub type Result<T> = std::result::Result<T, Error>;
