//! MIDI output from generated sequences.
//!
//! Chord progressions, melodies and drum patterns become single-track
//! Standard MIDI files (SMF format 0), which `merge_smf` can stack into one
//! multi-track file (format 1). Tokens are mapped to note events through the
//! preset tables; a token without a mapping is an error rather than a
//! silent rest.

use std::path::{Path, PathBuf};

use log::info;
use midly::{
	Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
	num::{u4, u7, u15, u24, u28},
};

use crate::error::Error;
use crate::io::build_output_path;
use crate::model::melody::MelodyNote;
use crate::model::presets::{chord_notes, drum_note};
use crate::model::sequence::Sequence;
use crate::model::song_plan::GeneratedSection;

/// Ticks per quarter note in MIDI output.
pub const TICKS_PER_QUARTER: u16 = 480;

pub const DEFAULT_TEMPO_BPM: u32 = 120;

const MIN_TEMPO_BPM: u32 = 4;
const MAX_TEMPO_BPM: u32 = 1000;

/// Each chord lasts two beats.
const CHORD_TICKS: u32 = 2 * TICKS_PER_QUARTER as u32;
const CHORD_VELOCITY: u8 = 100;
const CHORD_CHANNEL: u8 = 0;

/// Silence inserted between two song sections.
const SECTION_GAP_TICKS: u32 = TICKS_PER_QUARTER as u32;

/// Melody notes keep their own velocity and duration.
const MELODY_CHANNEL: u8 = 1;

/// One beat per drum hit.
const DRUM_TICKS: u32 = TICKS_PER_QUARTER as u32;
const DRUM_VELOCITY: u8 = 64;
/// General MIDI percussion channel (channel 10, zero-based 9).
const DRUM_CHANNEL: u8 = 9;

/// Keys struck together, held for `duration_ticks`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteEvent {
	pub keys: Vec<u8>,
	pub velocity: u8,
	pub duration_ticks: u32,
}

/// Maps chord numerals of `key` to note events.
///
/// # Errors
/// Returns `Error::UnknownToken` for a numeral without a voicing in `key`.
pub fn chord_events(key: &str, sequence: &Sequence<String>) -> Result<Vec<NoteEvent>, Error> {
	sequence
		.iter()
		.map(|numeral| {
			let keys = chord_notes(key, numeral).ok_or_else(|| Error::UnknownToken {
				token: numeral.clone(),
				context: format!("key {key}"),
			})?;
			Ok(NoteEvent { keys, velocity: CHORD_VELOCITY, duration_ticks: CHORD_TICKS })
		})
		.collect()
}

/// Maps drum names to note events.
///
/// # Errors
/// Returns `Error::UnknownToken` for a name without a General MIDI key.
pub fn drum_events(sequence: &Sequence<String>) -> Result<Vec<NoteEvent>, Error> {
	sequence
		.iter()
		.map(|name| {
			let key = drum_note(name).ok_or_else(|| Error::UnknownToken {
				token: name.clone(),
				context: "drum kit".to_owned(),
			})?;
			Ok(NoteEvent { keys: vec![key], velocity: DRUM_VELOCITY, duration_ticks: DRUM_TICKS })
		})
		.collect()
}

/// Maps melody notes to note events, keeping their articulation.
pub fn melody_events(sequence: &Sequence<MelodyNote>) -> Vec<NoteEvent> {
	sequence
		.iter()
		.map(|note| NoteEvent { keys: vec![note.key], velocity: note.velocity, duration_ticks: note.duration_ticks })
		.collect()
}

/// Renders generated chord sections, in order, to one track.
///
/// A one-beat gap separates consecutive sections. Each section's `graph`
/// names the key used to voice its numerals.
pub fn song_to_smf(sections: &[GeneratedSection], tempo_bpm: u32) -> Result<Smf<'static>, Error> {
	let mut writer = TrackWriter::new(b"Multi-Section Progression", CHORD_CHANNEL, tempo_bpm)?;
	for (i, section) in sections.iter().enumerate() {
		if i > 0 {
			writer.rest(SECTION_GAP_TICKS);
		}
		for event in chord_events(&section.graph, &section.sequence)? {
			writer.play(&event);
		}
	}
	Ok(single_track(writer.finish()))
}

/// Renders a drum sequence on the percussion channel.
pub fn drums_to_smf(sequence: &Sequence<String>, tempo_bpm: u32) -> Result<Smf<'static>, Error> {
	let mut writer = TrackWriter::new(b"Drum Pattern", DRUM_CHANNEL, tempo_bpm)?;
	for event in drum_events(sequence)? {
		writer.play(&event);
	}
	Ok(single_track(writer.finish()))
}

/// Renders a melody, one note after the other.
pub fn melody_to_smf(sequence: &Sequence<MelodyNote>, tempo_bpm: u32) -> Result<Smf<'static>, Error> {
	let mut writer = TrackWriter::new(b"Melody", MELODY_CHANNEL, tempo_bpm)?;
	for event in melody_events(sequence) {
		writer.play(&event);
	}
	Ok(single_track(writer.finish()))
}

/// Stacks the tracks of every part into one file played in parallel.
///
/// Parts keep their track names and channels and are expected to share
/// the tick resolution of this module.
pub fn merge_smf<'a, I>(parts: I) -> Smf<'a>
where
	I: IntoIterator<Item = Smf<'a>>,
{
	let mut merged = Smf::new(Header::new(Format::Parallel, Timing::Metrical(u15::new(TICKS_PER_QUARTER))));
	for part in parts {
		merged.tracks.extend(part.tracks);
	}
	merged
}

/// Writes `smf` as `folder/filename`, creating `folder` if needed.
///
/// Returns the full path of the written file.
pub fn write_smf<P: AsRef<Path>>(smf: &Smf<'_>, folder: P, filename: &str) -> Result<PathBuf, Error> {
	let path = build_output_path(folder, filename)?;
	smf.save(&path)?;
	info!("MIDI file saved as '{}'", path.display());
	Ok(path)
}

fn single_track(track: Track<'static>) -> Smf<'static> {
	let mut smf = Smf::new(Header::new(Format::SingleTrack, Timing::Metrical(u15::new(TICKS_PER_QUARTER))));
	smf.tracks.push(track);
	smf
}

/// Accumulates note events into a track, tracking delta times.
struct TrackWriter {
	track: Track<'static>,
	channel: u4,
	/// Ticks elapsed since the last written event.
	pending: u32,
}

impl TrackWriter {
	fn new(name: &'static [u8], channel: u8, tempo_bpm: u32) -> Result<Self, Error> {
		if !(MIN_TEMPO_BPM..=MAX_TEMPO_BPM).contains(&tempo_bpm) {
			return Err(Error::InvalidTempo(tempo_bpm));
		}

		let mut writer = Self { track: Vec::new(), channel: u4::new(channel), pending: 0 };
		writer.meta(MetaMessage::TrackName(name));
		writer.meta(MetaMessage::Tempo(u24::new(60_000_000 / tempo_bpm)));
		Ok(writer)
	}

	fn meta(&mut self, message: MetaMessage<'static>) {
		let delta = std::mem::take(&mut self.pending);
		self.track.push(TrackEvent { delta: u28::new(delta), kind: TrackEventKind::Meta(message) });
	}

	fn midi(&mut self, message: MidiMessage) {
		let delta = std::mem::take(&mut self.pending);
		self.track.push(TrackEvent {
			delta: u28::new(delta),
			kind: TrackEventKind::Midi { channel: self.channel, message },
		});
	}

	fn rest(&mut self, ticks: u32) {
		self.pending += ticks;
	}

	/// Strikes every key at once and releases them together.
	fn play(&mut self, event: &NoteEvent) {
		let vel = u7::new(event.velocity);
		for &key in &event.keys {
			self.midi(MidiMessage::NoteOn { key: u7::new(key), vel });
		}
		self.rest(event.duration_ticks);
		for &key in &event.keys {
			self.midi(MidiMessage::NoteOff { key: u7::new(key), vel });
		}
	}

	fn finish(mut self) -> Track<'static> {
		self.meta(MetaMessage::EndOfTrack);
		self.track
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn section(name: &str, graph: &str, tokens: &[&str]) -> GeneratedSection {
		GeneratedSection {
			name: name.to_owned(),
			graph: graph.to_owned(),
			sequence: Sequence::new(tokens.iter().map(|t| (*t).to_owned()).collect()),
		}
	}

	fn note_ons(track: &Track<'_>) -> Vec<(u32, u8, u8)> {
		track
			.iter()
			.filter_map(|event| match event.kind {
				TrackEventKind::Midi { channel, message: MidiMessage::NoteOn { key, .. } } => {
					Some((event.delta.as_int(), channel.as_int(), key.as_int()))
				}
				_ => None,
			})
			.collect()
	}

	#[test]
	fn chord_song_layout() {
		let sections = [section("Verse", "C", &["I", "V"]), section("Bridge", "Am", &["i", "V"])];
		let smf = song_to_smf(&sections, DEFAULT_TEMPO_BPM).unwrap();
		assert_eq!(smf.tracks.len(), 1);

		let track = &smf.tracks[0];
		// name + tempo + 4 chords * (3 on + 3 off) + end of track
		assert_eq!(track.len(), 2 + 4 * 6 + 1);
		assert_eq!(track[1].kind, TrackEventKind::Meta(MetaMessage::Tempo(u24::new(500_000))));

		let ons = note_ons(track);
		assert_eq!(&ons[..3], &[(0, 0, 60), (0, 0, 64), (0, 0, 67)]);
		// The first release of each chord waits for the chord's duration.
		assert_eq!(track[5].delta.as_int(), CHORD_TICKS);
		// Bridge starts after a one-beat gap, voiced in A minor.
		assert_eq!(&ons[6..9], &[(SECTION_GAP_TICKS, 0, 69), (0, 0, 60), (0, 0, 64)]);
		assert_eq!(&ons[9..], &[(0, 0, 64), (0, 0, 68), (0, 0, 71)]);
	}

	#[test]
	fn drums_use_percussion_channel() {
		let sequence = Sequence::new(vec!["Bass".to_owned(), "Snare".to_owned(), "Hi-Hat".to_owned()]);
		let smf = drums_to_smf(&sequence, 90).unwrap();
		let ons = note_ons(&smf.tracks[0]);
		assert_eq!(ons, [(0, 9, 35), (0, 9, 38), (0, 9, 42)]);
	}

	#[test]
	fn melody_keeps_articulation() {
		let sequence = Sequence::new(vec![MelodyNote::new(69, 90, 480), MelodyNote::new(72, 80, 240)]);
		let smf = melody_to_smf(&sequence, DEFAULT_TEMPO_BPM).unwrap();
		let track = &smf.tracks[0];

		assert_eq!(note_ons(track), [(0, 1, 69), (0, 1, 72)]);
		// name, tempo, A4 on/off, C5 on/off, end of track
		assert_eq!(track.len(), 7);
		assert_eq!(track[3].delta.as_int(), 480);
		assert_eq!(track[5].delta.as_int(), 240);
		assert_eq!(
			track[2].kind,
			TrackEventKind::Midi { channel: u4::new(1), message: MidiMessage::NoteOn { key: u7::new(69), vel: u7::new(90) } }
		);
	}

	#[test]
	fn merged_parts_play_in_parallel() {
		let chords = song_to_smf(&[section("Verse", "C", &["I", "IV"])], DEFAULT_TEMPO_BPM).unwrap();
		let melody = melody_to_smf(&Sequence::new(vec![MelodyNote::new(67, 64, 480)]), DEFAULT_TEMPO_BPM).unwrap();
		let drums = drums_to_smf(&Sequence::new(vec!["Bass".to_owned()]), DEFAULT_TEMPO_BPM).unwrap();

		let merged = merge_smf([chords, melody, drums]);
		assert_eq!(merged.header.format, Format::Parallel);
		assert_eq!(merged.tracks.len(), 3);

		let names: Vec<&[u8]> = merged
			.tracks
			.iter()
			.filter_map(|track| match track[0].kind {
				TrackEventKind::Meta(MetaMessage::TrackName(name)) => Some(name),
				_ => None,
			})
			.collect();
		assert_eq!(names, [&b"Multi-Section Progression"[..], &b"Melody"[..], &b"Drum Pattern"[..]]);

		let dir = tempfile::tempdir().unwrap();
		let path = write_smf(&merged, dir.path(), "merged_song.mid").unwrap();
		let bytes = std::fs::read(&path).unwrap();
		let parsed = Smf::parse(&bytes).unwrap();
		assert_eq!(parsed.header.format, Format::Parallel);
		assert_eq!(note_ons(&parsed.tracks[2]), [(0, 9, 35)]);
	}

	#[test]
	fn unmapped_tokens_are_errors() {
		let sections = [section("Verse", "C", &["I", "bVII"])];
		assert!(matches!(
			song_to_smf(&sections, DEFAULT_TEMPO_BPM),
			Err(Error::UnknownToken { token, .. }) if token == "bVII"
		));

		let sequence = Sequence::new(vec!["Cowbell".to_owned()]);
		assert!(matches!(drum_events(&sequence), Err(Error::UnknownToken { .. })));
	}

	#[test]
	fn tempo_must_fit_a_midi_tempo() {
		let sequence = Sequence::new(vec!["Bass".to_owned()]);
		assert!(matches!(drums_to_smf(&sequence, 0), Err(Error::InvalidTempo(0))));
		assert!(matches!(drums_to_smf(&sequence, 3), Err(Error::InvalidTempo(3))));
		assert!(drums_to_smf(&sequence, 4).is_ok());
	}

	#[test]
	fn written_file_parses_back() {
		let dir = tempfile::tempdir().unwrap();
		let sequence = Sequence::new(vec!["Bass".to_owned(), "Tom".to_owned()]);
		let smf = drums_to_smf(&sequence, DEFAULT_TEMPO_BPM).unwrap();

		let path = write_smf(&smf, dir.path().join("createdFiles"), "drum_pattern.mid").unwrap();
		let bytes = std::fs::read(&path).unwrap();
		let parsed = Smf::parse(&bytes).unwrap();
		assert_eq!(parsed.tracks.len(), 1);
		assert_eq!(note_ons(&parsed.tracks[0]), note_ons(&smf.tracks[0]));
	}
}
