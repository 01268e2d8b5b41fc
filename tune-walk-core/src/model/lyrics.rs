//! Lyric walks constrained by a rhyme scheme.
//!
//! The lyric graph links every phrase to a few phrases of its own rhyme
//! group and a few of the others. A rhyme scheme such as `"AABB"` is
//! cycled line after line: each next phrase is one of the current
//! phrase's neighbours in the required group, or any phrase of that group
//! when no neighbour rhymes.

use std::collections::HashMap;

use log::debug;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::presets::rhyme_group;
use super::sequence::Sequence;
use super::transition_graph::TransitionGraph;
use crate::error::{Error, GenerateError};

/// One sung line and the song section it belongs to.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LyricLine {
	pub section: String,
	pub text: String,
}

/// Walks `graph` for `lines` phrases following `scheme`.
///
/// # Behavior
/// - Line `i` rhymes with group `scheme[i % scheme.len()]`.
/// - The first phrase is drawn uniformly from its group.
/// - Each next phrase is drawn uniformly among the current phrase's
///   neighbours of the required group; when there is none, among every
///   phrase of that group.
///
/// # Errors
/// - `Error::Generate(InvalidLength)` if `lines == 0`.
/// - `Error::InvalidRhymeScheme` if `scheme` is empty or names a group
///   with no phrase in `graph`.
pub fn generate_rhyming<R: Rng + ?Sized>(
	graph: &TransitionGraph<String>,
	scheme: &str,
	lines: usize,
	rng: &mut R,
) -> Result<Sequence<String>, Error> {
	if lines < 1 {
		return Err(GenerateError::InvalidLength(lines).into());
	}
	let invalid = || Error::InvalidRhymeScheme(scheme.to_owned());

	let groups: Vec<char> = scheme.chars().collect();
	let pools: Vec<Vec<&String>> = groups
		.iter()
		.map(|&group| graph.nodes().filter(|phrase| rhyme_group(phrase) == Some(group)).collect())
		.collect();
	if pools.is_empty() || pools.iter().any(Vec::is_empty) {
		return Err(invalid());
	}

	let mut current: &String = pools[0].choose(&mut *rng).copied().ok_or_else(invalid)?;
	let mut phrases = vec![current.clone()];

	for i in 1..lines {
		let group = groups[i % groups.len()];
		let rhyming: Vec<&String> = graph
			.edges(current)
			.iter()
			.map(|(target, _)| target)
			.filter(|target| rhyme_group(target) == Some(group))
			.collect();

		current = match rhyming.choose(&mut *rng) {
			Some(&next) => next,
			None => {
				debug!("no neighbour of {current:?} rhymes with {group}, picking from the whole group");
				pools[i % groups.len()].choose(&mut *rng).copied().ok_or_else(invalid)?
			}
		};
		phrases.push(current.clone());
	}

	Ok(Sequence::new(phrases))
}

/// Writes the lyrics of a whole song.
///
/// `structure` lists `(section name, rhyme scheme)` pairs in singing
/// order. A pair seen before repeats the lines written the first time,
/// so every chorus is sung with the same words.
pub fn lyric_sheet<R: Rng + ?Sized>(
	graph: &TransitionGraph<String>,
	structure: &[(&str, &str)],
	lines_per_section: usize,
	rng: &mut R,
) -> Result<Vec<LyricLine>, Error> {
	let mut written: HashMap<(&str, &str), Sequence<String>> = HashMap::new();
	let mut sheet = Vec::new();

	for &(section, scheme) in structure {
		let phrases = match written.get(&(section, scheme)) {
			Some(phrases) => phrases.clone(),
			None => {
				let phrases = generate_rhyming(graph, scheme, lines_per_section, &mut *rng)?;
				written.insert((section, scheme), phrases.clone());
				phrases
			}
		};
		sheet.extend(phrases.into_iter().map(|text| LyricLine { section: section.to_owned(), text }));
	}

	Ok(sheet)
}
