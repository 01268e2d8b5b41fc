use std::fmt;

use serde::{Deserialize, Serialize};

const NOTE_NAMES: [&str; 12] = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];

/// One melody note used as a graph token.
///
/// Two notes on the same key with a different velocity or duration are
/// distinct tokens (an accented A4 is not a plain A4).
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MelodyNote {
	/// MIDI key (60 = C4).
	pub key: u8,
	pub velocity: u8,
	pub duration_ticks: u32,
}

impl MelodyNote {
	pub const fn new(key: u8, velocity: u8, duration_ticks: u32) -> Self {
		Self { key, velocity, duration_ticks }
	}
}

/// Scientific pitch name of a MIDI key, e.g. 69 -> `A4`.
pub fn note_name(key: u8) -> String {
	let octave = i32::from(key / 12) - 1;
	format!("{}{}", NOTE_NAMES[usize::from(key % 12)], octave)
}

/// Formats as the pitch name only.
impl fmt::Display for MelodyNote {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&note_name(self.key))
	}
}
