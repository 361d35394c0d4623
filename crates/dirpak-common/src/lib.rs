//! Common utilities for dirpak.
//!
//! This crate provides the foundational pieces shared by the dirpak crates:
//!
//! - [`BinaryReader`] - Bounds-checked binary reading from byte slices
//! - [`Error`] - Underrun errors raised while reading

mod error;
mod reader;

pub use error::{Error, Result};
pub use reader::BinaryReader;
