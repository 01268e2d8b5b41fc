//! Hand-authored graphs and MIDI tables.
//!
//! Every preset is built on demand and handed to the caller; nothing here
//! is global mutable state.

use rand::Rng;
use rand::seq::IndexedRandom;

use super::arrangement::palette_graph;
use super::melody::MelodyNote;
use super::section::GraphLibrary;
use super::transition_graph::{TransitionGraph, TransitionGraphBuilder};
use crate::error::GraphError;

/// Chord transitions in C major, weights as relative likelihoods.
const C_MAJOR_EDGES: &[(&str, &str, f64)] = &[
	("I", "IV", 0.3), ("I", "V", 0.3), ("I", "vi", 0.2),
	("ii", "V", 0.5), ("ii", "IV", 0.3),
	("iii", "vi", 0.4), ("iii", "IV", 0.3),
	("IV", "V", 0.4), ("IV", "I", 0.3),
	("V", "I", 0.5), ("V", "vi", 0.3),
	("vi", "IV", 0.3), ("vi", "ii", 0.3), ("vi", "V", 0.2),
	("viio", "I", 0.6), ("viio", "V", 0.2),
];

/// Chord transitions in A minor (relative minor of C).
///
/// `V` is the harmonic-minor dominant (E G# B), distinct from `v`.
const A_MINOR_EDGES: &[(&str, &str, f64)] = &[
	("i", "iv", 0.3), ("i", "V", 0.3), ("i", "VII", 0.2),
	("iio", "V", 0.4), ("iio", "i", 0.3),
	("III", "VI", 0.3), ("III", "iv", 0.3),
	("iv", "V", 0.4), ("iv", "i", 0.3),
	("v", "i", 0.4), ("v", "VI", 0.3),
	("VI", "III", 0.3), ("VI", "iio", 0.2), ("VI", "V", 0.2),
	("VII", "III", 0.3), ("VII", "i", 0.4),
	("V", "i", 0.5), ("V", "VI", 0.3),
];

const C_MAJOR_CHORDS: &[(&str, [&str; 3])] = &[
	("I", ["C", "E", "G"]),
	("ii", ["D", "F", "A"]),
	("iii", ["E", "G", "B"]),
	("IV", ["F", "A", "C"]),
	("V", ["G", "B", "D"]),
	("vi", ["A", "C", "E"]),
	("viio", ["B", "D", "F"]),
];

const A_MINOR_CHORDS: &[(&str, [&str; 3])] = &[
	("i", ["A", "C", "E"]),
	("iio", ["B", "D", "F"]),
	("III", ["C", "E", "G"]),
	("iv", ["D", "F", "A"]),
	("v", ["E", "G", "B"]),
	("VI", ["F", "A", "C"]),
	("VII", ["G", "B", "D"]),
	("V", ["E", "G#", "B"]),
];

/// Drum beat progression. Every edge counts once; the repeated
/// Snare -> Hi-Hat edge therefore weighs twice as much.
const DRUM_EDGES: &[(&str, &str)] = &[
	("Bass", "Snare"),
	("Snare", "Hi-Hat"),
	("Hi-Hat", "Clap"),
	("Clap", "Tom"),
	("Tom", "Cymbal"),
	("Cymbal", "Bass"),
	("Hi-Hat", "Hi-Hat"),
	("Bass", "Bass"),
	("Snare", "Hi-Hat"),
	("Hi-Hat", "Bass"),
];

/// General MIDI percussion keys.
const DRUM_NOTES: &[(&str, u8)] = &[
	("Bass", 35),   // Acoustic Bass Drum
	("Snare", 38),  // Acoustic Snare
	("Hi-Hat", 42), // Closed Hi-Hat
	("Clap", 39),   // Hand Clap
	("Tom", 45),    // Low Tom
	("Cymbal", 49), // Crash Cymbal 1
];

/// Phrases grouped by rhyme.
pub const RHYME_GROUPS: &[(char, [&str; 4])] = &[
	('A', ["CS 5002 leads the way", "Graphs connect, concepts stay", "Paths align, logic at play", "Dr. Amjad guides our day"]),
	('B', ["Trees reach high, edges call", "Cycles spin, graphs enthrall", "Sorting schemes that solve it all", "Functions rise, answers fall"]),
	('C', ["Shortest paths, we compute", "Nodes refine, roots astute", "Weights align, data resolute", "Graphs design, goals pursuit"]),
	('D', ["Counting dreams, logic supreme", "Graphs reveal a hidden theme", "Sorting flows like data streams", "Structures guide our greatest scheme"]),
	('E', ["Spanning free, matchings decree", "CS 5002 builds unity", "Graphs agree, complexity foresee", "Dr. Amjad inspires me"]),
];

pub const VERSE_1: &str = "Verse 1";
pub const CHORUS: &str = "Chorus";
pub const VERSE_2: &str = "Verse 2";
pub const BRIDGE: &str = "Bridge";

/// Song sections in singing order, with the rhyme scheme of their lyrics.
pub const SONG_STRUCTURE: &[(&str, &str)] = &[
	(VERSE_1, "BBCC"),
	(CHORUS, "AAAA"),
	(VERSE_2, "BBCC"),
	(CHORUS, "AAAA"),
	(BRIDGE, "DDEE"),
	(CHORUS, "AAAA"),
];

const fn note(key: u8, velocity: u8, duration_ticks: u32) -> MelodyNote {
	MelodyNote::new(key, velocity, duration_ticks)
}

/// Notes each section's melody is drawn from. Velocity and duration carry
/// the articulation: 240 ticks is staccato, 960 legato, velocity 90+ an accent.
const MELODY_PALETTES: &[(&str, &[MelodyNote])] = &[
	(VERSE_1, &[
		note(69, 64, 480), note(72, 80, 240), note(67, 64, 480), note(69, 90, 480),
		note(74, 64, 480), note(77, 64, 960), note(79, 64, 480), note(77, 64, 480),
	]),
	(CHORUS, &[
		note(65, 64, 480), note(67, 64, 480), note(69, 80, 960), note(71, 64, 480), note(72, 100, 480),
		note(71, 64, 480), note(69, 64, 960), note(67, 64, 480), note(65, 64, 480),
	]),
	(VERSE_2, &[
		note(72, 64, 480), note(74, 80, 240), note(77, 64, 480), note(79, 90, 480),
		note(81, 64, 480), note(77, 64, 960), note(76, 64, 480), note(72, 64, 480),
	]),
	(BRIDGE, &[
		note(79, 64, 480), note(81, 64, 480), note(84, 90, 480), note(81, 64, 480), note(77, 64, 480),
		note(76, 64, 960), note(72, 64, 480), note(74, 64, 480), note(76, 64, 480),
	]),
];

/// Drum instruments each section's hits are drawn from.
const DRUM_PALETTES: &[(&str, &[&str])] = &[
	(VERSE_1, &["Bass", "Snare", "Hi-Hat", "Tom"]),
	(CHORUS, &["Bass", "Snare", "Cymbal", "Clap"]),
	(VERSE_2, &["Bass", "Snare", "Hi-Hat", "Tom"]),
	(BRIDGE, &["Bass", "Snare", "Cymbal", "Clap"]),
];

/// Key of the drum palette played by sections without their own.
pub const DEFAULT_DRUM_PALETTE: &str = "default";
const DEFAULT_DRUMS: &[&str] = &["Bass", "Snare"];

pub const C_MAJOR: &str = "C";
pub const A_MINOR: &str = "Am";
pub const DRUMS: &str = "drums";
pub const LYRICS: &str = "lyrics";

/// Links from each phrase to phrases of its own rhyme group.
const SAME_GROUP_LINKS: usize = 2;
/// Links from each phrase to phrases of the other rhyme groups.
const OTHER_GROUP_LINKS: usize = 3;

fn owned_graph(edges: &[(&str, &str, f64)]) -> Result<TransitionGraph<String>, GraphError> {
	TransitionGraph::from_edges(edges.iter().map(|&(from, to, weight)| (from.to_owned(), to.to_owned(), weight)))
}

/// C major (start `I`) and A minor (start `i`) chord graphs.
pub fn chord_library() -> Result<GraphLibrary<String>, GraphError> {
	let mut library = GraphLibrary::new();
	library.insert(C_MAJOR, owned_graph(C_MAJOR_EDGES)?, "I".to_owned())?;
	library.insert(A_MINOR, owned_graph(A_MINOR_EDGES)?, "i".to_owned())?;
	Ok(library)
}

/// MIDI keys of the triad `numeral` in `key` (`"C"` or `"Am"`).
///
/// All notes sit in the octave starting at middle C (C4 = 60).
pub fn chord_notes(key: &str, numeral: &str) -> Option<Vec<u8>> {
	let chords = match key {
		C_MAJOR => C_MAJOR_CHORDS,
		A_MINOR => A_MINOR_CHORDS,
		_ => return None,
	};
	let (_, names) = chords.iter().find(|(name, _)| *name == numeral)?;
	names.iter().map(|name| note_to_midi(name)).collect()
}

fn note_to_midi(name: &str) -> Option<u8> {
	match name {
		"C" => Some(60),
		"D" => Some(62),
		"E" => Some(64),
		"F" => Some(65),
		"G" => Some(67),
		"G#" => Some(68),
		"A" => Some(69),
		"B" => Some(71),
		_ => None,
	}
}

/// The drum beat graph under `"drums"`, starting on `Bass`.
pub fn drum_library() -> Result<GraphLibrary<String>, GraphError> {
	let mut builder = TransitionGraphBuilder::new();
	builder.add_edges(DRUM_EDGES.iter().map(|&(from, to)| (from.to_owned(), to.to_owned(), 1.0)))?;

	let mut library = GraphLibrary::new();
	library.insert(DRUMS, builder.build(), "Bass".to_owned())?;
	Ok(library)
}

/// General MIDI key for a drum name.
pub fn drum_note(name: &str) -> Option<u8> {
	DRUM_NOTES.iter().find(|(drum, _)| *drum == name).map(|(_, note)| *note)
}

/// Rhyme group of a lyric phrase.
pub fn rhyme_group(phrase: &str) -> Option<char> {
	RHYME_GROUPS
		.iter()
		.find(|(_, phrases)| phrases.contains(&phrase))
		.map(|(group, _)| *group)
}

/// Builds the lyric phrase graph.
///
/// Every phrase links (weight 1.0) to 2 random phrases of its own rhyme
/// group and 3 random phrases of the other groups. The links are drawn
/// from `rng`, so a seeded source reproduces the same graph.
pub fn lyric_graph<R: Rng + ?Sized>(rng: &mut R) -> Result<TransitionGraph<String>, GraphError> {
	let mut builder = TransitionGraphBuilder::new();
	for (_, phrases) in RHYME_GROUPS {
		for phrase in phrases {
			builder.add_node((*phrase).to_owned());
		}
	}

	for (group, phrases) in RHYME_GROUPS {
		let others: Vec<&str> = RHYME_GROUPS
			.iter()
			.filter(|(other, _)| other != group)
			.flat_map(|(_, phrases)| phrases.iter().copied())
			.collect();

		for phrase in phrases {
			let same: Vec<&str> = phrases.iter().copied().filter(|p| p != phrase).collect();
			let targets: Vec<&str> = same
				.choose_multiple(&mut *rng, SAME_GROUP_LINKS)
				.chain(others.choose_multiple(&mut *rng, OTHER_GROUP_LINKS))
				.copied()
				.collect();
			for target in targets {
				builder.add_edge((*phrase).to_owned(), target.to_owned(), 1.0)?;
			}
		}
	}

	Ok(builder.build())
}

/// The lyric graph under `"lyrics"`, starting on the first phrase of group A.
pub fn lyric_library<R: Rng + ?Sized>(rng: &mut R) -> Result<GraphLibrary<String>, GraphError> {
	let start = RHYME_GROUPS[0].1[0].to_owned();
	let mut library = GraphLibrary::new();
	library.insert(LYRICS, lyric_graph(rng)?, start)?;
	Ok(library)
}

/// Melody notes of a song section, in table order.
pub fn melody_palette(section: &str) -> Option<Vec<MelodyNote>> {
	MELODY_PALETTES
		.iter()
		.find(|(name, _)| *name == section)
		.map(|(_, notes)| notes.to_vec())
}

/// One palette graph per song section, each starting on its first note.
pub fn melody_library() -> Result<GraphLibrary<MelodyNote>, GraphError> {
	let mut library = GraphLibrary::new();
	for (section, notes) in MELODY_PALETTES {
		library.insert(section, palette_graph(notes)?, notes[0])?;
	}
	Ok(library)
}

/// Drum instruments of a song section; the default palette for any other.
pub fn drum_palette(section: &str) -> &'static [&'static str] {
	DRUM_PALETTES
		.iter()
		.find(|(name, _)| *name == section)
		.map_or(DEFAULT_DRUMS, |(_, drums)| *drums)
}

/// One palette graph per song section plus the default palette, each
/// starting on `Bass`.
pub fn drum_palette_library() -> Result<GraphLibrary<String>, GraphError> {
	let palettes = DRUM_PALETTES.iter().copied().chain([(DEFAULT_DRUM_PALETTE, DEFAULT_DRUMS)]);

	let mut library = GraphLibrary::new();
	for (section, drums) in palettes {
		let drums: Vec<String> = drums.iter().map(|drum| (*drum).to_owned()).collect();
		library.insert(section, palette_graph(&drums)?, drums[0].clone())?;
	}
	Ok(library)
}

/// Every preset: chords, drums and lyrics in one library.
pub fn preset_library<R: Rng + ?Sized>(rng: &mut R) -> Result<GraphLibrary<String>, GraphError> {
	let mut library = chord_library()?;
	library.merge(drum_library()?);
	library.merge(lyric_library(rng)?);
	Ok(library)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	#[test]
	fn chord_graphs_match_tables() {
		let library = chord_library().unwrap();
		let major = library.get(C_MAJOR).unwrap();
		assert_eq!(major.default_start(), "I");
		assert_eq!(major.graph().node_count(), 7);
		assert_eq!(major.graph().edge_count(), C_MAJOR_EDGES.len());

		let minor = library.get(A_MINOR).unwrap();
		assert_eq!(minor.default_start(), "i");
		assert_eq!(minor.graph().node_count(), 8);
		assert!((minor.graph().probability(&"V".to_owned(), &"i".to_owned()) - 0.625).abs() < 1e-12);
	}

	#[test]
	fn every_chord_node_has_a_voicing() {
		let library = chord_library().unwrap();
		for key in library.keys() {
			for numeral in library.get(key).unwrap().graph().nodes() {
				let notes = chord_notes(key, numeral).unwrap();
				assert_eq!(notes.len(), 3, "{key} {numeral}");
			}
		}
		assert_eq!(chord_notes(A_MINOR, "V"), Some(vec![64, 68, 71]));
		assert_eq!(chord_notes(C_MAJOR, "IV"), Some(vec![65, 69, 60]));
		assert_eq!(chord_notes("G", "I"), None);
		assert_eq!(chord_notes(C_MAJOR, "bVII"), None);
	}

	#[test]
	fn drum_graph_weights_repeated_edge() {
		let library = drum_library().unwrap();
		let drums = library.get(DRUMS).unwrap();
		let graph = drums.graph();
		assert_eq!(drums.default_start(), "Bass");
		assert_eq!(graph.node_count(), 6);
		assert_eq!(graph.edges(&"Snare".to_owned()), &[("Hi-Hat".to_owned(), 2.0)]);
		assert!((graph.probability(&"Hi-Hat".to_owned(), &"Clap".to_owned()) - 1.0 / 3.0).abs() < 1e-12);
		for node in graph.nodes() {
			assert!(drum_note(node).is_some(), "{node}");
			assert!(!graph.is_sink(node));
		}
	}

	#[test]
	fn lyric_graph_links_within_and_across_groups() {
		let mut rng = StdRng::seed_from_u64(5002);
		let graph = lyric_graph(&mut rng).unwrap();
		assert_eq!(graph.node_count(), 20);

		for node in graph.nodes() {
			let group = rhyme_group(node).unwrap();
			let edges = graph.edges(node);
			let same = edges.iter().filter(|(target, _)| rhyme_group(target) == Some(group)).count();
			assert_eq!(same, SAME_GROUP_LINKS, "{node}");
			assert_eq!(edges.len(), SAME_GROUP_LINKS + OTHER_GROUP_LINKS, "{node}");
			assert!(edges.iter().all(|(target, _)| target != node));
		}
	}

	#[test]
	fn lyric_graph_is_reproducible() {
		let a = lyric_graph(&mut StdRng::seed_from_u64(1)).unwrap();
		let b = lyric_graph(&mut StdRng::seed_from_u64(1)).unwrap();
		for node in a.nodes() {
			assert_eq!(a.edges(node), b.edges(node));
		}
	}

	#[test]
	fn melody_palettes_cover_the_song() {
		let library = melody_library().unwrap();
		for (section, _) in SONG_STRUCTURE {
			let palette = melody_palette(section).unwrap();
			let graph = library.get(section).unwrap().graph();
			assert_eq!(library.get(section).unwrap().default_start(), &palette[0]);
			assert!(palette.iter().all(|note| graph.contains(note)));
		}
		assert_eq!(melody_palette(VERSE_1).unwrap()[1], MelodyNote::new(72, 80, 240));
		assert_eq!(melody_palette("Outro"), None);

		// The chorus lists plain G4 twice: twice as likely as its legato A4.
		let chorus = library.get(CHORUS).unwrap().graph();
		let from = MelodyNote::new(65, 64, 480);
		let ratio = chorus.probability(&from, &MelodyNote::new(67, 64, 480))
			/ chorus.probability(&from, &MelodyNote::new(69, 80, 960));
		assert!((ratio - 2.0).abs() < 1e-12);
	}

	#[test]
	fn drum_palettes_fall_back_to_bass_and_snare() {
		assert_eq!(drum_palette(CHORUS), &["Bass", "Snare", "Cymbal", "Clap"]);
		assert_eq!(drum_palette("Outro"), &["Bass", "Snare"]);

		let library = drum_palette_library().unwrap();
		assert_eq!(library.len(), DRUM_PALETTES.len() + 1);
		let fallback = library.get(DEFAULT_DRUM_PALETTE).unwrap();
		assert_eq!(fallback.graph().node_count(), 2);
		for section in library.keys() {
			for drum in library.get(section).unwrap().graph().nodes() {
				assert!(drum_note(drum).is_some(), "{section} {drum}");
			}
		}
	}

	#[test]
	fn preset_library_holds_every_section() {
		let library = preset_library(&mut StdRng::seed_from_u64(0)).unwrap();
		assert_eq!(library.keys().collect::<Vec<_>>(), [A_MINOR, C_MAJOR, DRUMS, LYRICS]);
	}
}
