//! Top-level module for the graph-walk generation system.
//!
//! This module provides:
//! - Per-token outgoing transitions (`State`)
//! - Immutable transition graphs and their builder (`TransitionGraph`)
//! - The weighted random-walk generator (`generate`)
//! - Named graph libraries with default start tokens (`GraphLibrary`)
//! - Hand-authored preset graphs (chords, drums, melodies, lyrics)
//! - Rhyme-scheme lyric walks and lyric-driven melody and drum patterns
//! - Serializable song plans driving several generations at once

use std::fmt::Debug;
use std::hash::Hash;

/// Melody and drum patterns walked line by line along the lyrics.
pub mod arrangement;

/// Weighted random walk over a `TransitionGraph`.
///
/// The only operation of the core: pure, seedable, bounded by a length.
pub mod generator;

/// Named graphs (musical key, drum kit, ...) with their default start token.
pub mod section;

/// Rhyme-scheme lyric walks and song lyric sheets.
pub mod lyrics;

/// Melody notes usable as graph tokens.
pub mod melody;

/// Preset graphs and MIDI voicings taken from the hand-authored tables.
pub mod presets;

/// Ordered output of one walk.
pub mod sequence;

/// JSON-configurable list of sections to generate in a row.
pub mod song_plan;

/// Outgoing weighted transitions of one token.
///
/// Tracks outgoing edges and supports weighted random sampling.
pub mod state;

/// Immutable directed, edge-weighted graph over tokens, and its builder.
pub mod transition_graph;

/// Anything usable as a node of a transition graph.
///
/// Blanket-implemented: `String`, `&str`, `char`, small enums, ...
pub trait Token: Eq + Hash + Clone + Debug {}

impl<T: Eq + Hash + Clone + Debug> Token for T {}
