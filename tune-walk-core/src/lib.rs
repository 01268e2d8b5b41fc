//! Weighted random-walk generation of toy musical sequences.
//!
//! This crate provides a small graph-walking toolkit including:
//! - Immutable, edge-weighted transition graphs over arbitrary tokens
//! - A seedable weighted random-walk sequence generator
//! - Named graph libraries (musical keys, drum kits, lyric groups)
//! - Preset graphs, rhyme-scheme lyrics and lyric-driven patterns
//! - MIDI rendering of generated sequences, alone or merged
//!
//! Graphs are built once and only read during generation. Randomness is
//! always injected by the caller, so identical seeds reproduce identical
//! sequences.

/// Crate-level error types.
pub mod error;

/// Transition graphs, the sequence generator and graph libraries.
pub mod model;

/// Conversion of generated sequences into Standard MIDI files.
pub mod render;

/// I/O utilities (file loading, output folders).
///
/// Not exposed
pub(crate) mod io;

pub use error::{Error, GenerateError, GraphError};
