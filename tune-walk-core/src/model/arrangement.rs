//! Patterns that follow the lyrics.
//!
//! Every song section owns a palette (melody notes, drum instruments).
//! Each lyric line gets a few tokens walked from the palette of its
//! section. A palette graph links every entry to every entry, so a walk
//! over it is a sequence of independent picks where an entry listed twice
//! is twice as likely.

use std::collections::HashMap;
use std::ops::RangeInclusive;

use rand::Rng;

use super::Token;
use super::lyrics::LyricLine;
use super::melody::MelodyNote;
use super::presets::DEFAULT_DRUM_PALETTE;
use super::section::GraphLibrary;
use super::sequence::Sequence;
use super::transition_graph::{TransitionGraph, TransitionGraphBuilder};
use crate::error::{Error, GenerateError, GraphError};

/// Melody notes sung on one lyric line.
pub const MELODY_NOTES_PER_LINE: RangeInclusive<usize> = 2..=4;

/// Drum hits played under one lyric line.
pub const DRUM_HITS_PER_LINE: RangeInclusive<usize> = 2..=3;

/// Complete graph over a palette, one unit of weight per listed entry.
pub fn palette_graph<T: Token>(palette: &[T]) -> Result<TransitionGraph<T>, GraphError> {
	let mut builder = TransitionGraphBuilder::new();
	for from in palette {
		for to in palette {
			builder.add_edge(from.clone(), to.clone(), 1.0)?;
		}
	}
	Ok(builder.build())
}

/// Walks `per_line` tokens (drawn in the range) for every lyric line.
///
/// The graph is picked by the line's section name, or `fallback` when
/// the library has no such section. Consecutive lines of a section
/// continue the same walk; the first line of a section starts from its
/// default start token, which is not emitted.
///
/// # Errors
/// - `Error::EmptyLyrics` if `lines` is empty.
/// - `Error::Generate(InvalidLength)` if `per_line` is empty or starts at 0.
/// - `Error::UnknownSection` if neither the section nor `fallback` exists.
pub fn arrange<T, R>(
	lines: &[LyricLine],
	library: &GraphLibrary<T>,
	fallback: Option<&str>,
	per_line: RangeInclusive<usize>,
	rng: &mut R,
) -> Result<Sequence<T>, Error>
where
	T: Token,
	R: Rng + ?Sized,
{
	if lines.is_empty() {
		return Err(Error::EmptyLyrics);
	}
	if per_line.is_empty() || *per_line.start() == 0 {
		return Err(GenerateError::InvalidLength(*per_line.start()).into());
	}

	let mut tokens = Vec::new();
	let mut last: HashMap<&str, T> = HashMap::new();

	for line in lines {
		let key = if library.get(&line.section).is_some() {
			line.section.as_str()
		} else {
			fallback
				.filter(|key| library.get(key).is_some())
				.ok_or_else(|| Error::UnknownSection(line.section.clone()))?
		};

		let count = rng.random_range(per_line.clone());
		let walk = library.generate_section(key, count + 1, last.get(key), &mut *rng)?;
		if let Some(end) = walk.last() {
			last.insert(key, end.clone());
		}
		tokens.extend(walk.into_iter().skip(1));
	}

	Ok(Sequence::try_from(tokens)?)
}

/// Melody for the lyrics, 2 to 4 notes per line.
pub fn melody_for_lyrics<R: Rng + ?Sized>(
	lines: &[LyricLine],
	library: &GraphLibrary<MelodyNote>,
	rng: &mut R,
) -> Result<Sequence<MelodyNote>, Error> {
	arrange(lines, library, None, MELODY_NOTES_PER_LINE, rng)
}

/// Drum hits for the lyrics, 2 or 3 per line.
///
/// Sections without their own palette play the default one.
pub fn drums_for_lyrics<R: Rng + ?Sized>(
	lines: &[LyricLine],
	library: &GraphLibrary<String>,
	rng: &mut R,
) -> Result<Sequence<String>, Error> {
	arrange(lines, library, Some(DEFAULT_DRUM_PALETTE), DRUM_HITS_PER_LINE, rng)
}
