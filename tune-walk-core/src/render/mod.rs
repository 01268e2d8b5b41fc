//! Rendering of generated sequences.
//!
//! The generator knows nothing about file formats; this module maps
//! tokens to note events and writes Standard MIDI files with `midly`.

/// Chord, melody and drum sequences to Standard MIDI files.
pub mod midi;
