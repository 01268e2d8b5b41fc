use std::collections::HashMap;
use std::path::Path;

use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::presets::{A_MINOR, C_MAJOR};
use super::section::GraphLibrary;
use super::sequence::Sequence;
use crate::error::Error;
use crate::io::read_file;

fn default_length() -> usize {
	4
}

/// One section of a song: which graph to walk and for how long.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SectionPlan {
	/// Display name ("Verse", "Chorus", ...).
	pub name: String,
	/// Key of the section in the `GraphLibrary`.
	pub graph: String,
	/// Maximum number of tokens (4 when omitted).
	#[serde(default = "default_length")]
	pub length: usize,
	/// Explicit start token; the section default when omitted.
	#[serde(default)]
	pub start: Option<String>,
}

/// Ordered list of sections, typically loaded from a JSON file:
///
/// ```json
/// { "sections": [
///     { "name": "Verse", "graph": "C", "length": 4 },
///     { "name": "Bridge", "graph": "Am", "start": "VI" }
/// ] }
/// ```
///
/// A section that appears again with the same name, graph, length and
/// start repeats the sequence generated the first time (a chorus sounds
/// the same every time it comes back). Any difference gets a fresh walk.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SongPlan {
	pub sections: Vec<SectionPlan>,
}

/// A section once generated.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GeneratedSection {
	pub name: String,
	pub graph: String,
	pub sequence: Sequence<String>,
}

impl SongPlan {
	/// Loads a plan from a JSON file.
	///
	/// # Errors
	/// Returns `Error::Io` if the file cannot be read and `Error::Plan` if
	/// it is not a valid plan.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
		let data = read_file(path)?;
		Self::from_json(&data)
	}

	/// Parses a plan from a JSON string.
	pub fn from_json(data: &str) -> Result<Self, Error> {
		Ok(serde_json::from_str(data)?)
	}

	/// Verse, chorus, bridge (relative minor), chorus; 4 chords each.
	pub fn default_plan() -> Self {
		let section = |name: &str, graph: &str| SectionPlan {
			name: name.to_owned(),
			graph: graph.to_owned(),
			length: default_length(),
			start: None,
		};
		Self {
			sections: vec![
				section("Verse", C_MAJOR),
				section("Chorus", C_MAJOR),
				section("Bridge", A_MINOR),
				section("Chorus", C_MAJOR),
			],
		}
	}

	/// Generates every section in order.
	///
	/// # Errors
	/// Stops at the first section that fails (unknown graph, invalid
	/// length or start token).
	pub fn generate<R: Rng + ?Sized>(
		&self,
		library: &GraphLibrary<String>,
		rng: &mut R,
	) -> Result<Vec<GeneratedSection>, Error> {
		let mut generated: Vec<GeneratedSection> = Vec::with_capacity(self.sections.len());
		let mut first_seen: HashMap<&SectionPlan, usize> = HashMap::new();

		for plan in &self.sections {
			if let Some(&index) = first_seen.get(plan) {
				let repeat = generated[index].clone();
				info!("{}: repeating {}", plan.name, repeat.sequence);
				generated.push(repeat);
				continue;
			}

			let sequence = library.generate_section(&plan.graph, plan.length, plan.start.as_ref(), &mut *rng)?;
			info!("{} ({}): {}", plan.name, plan.graph, sequence);
			first_seen.insert(plan, generated.len());
			generated.push(GeneratedSection {
				name: plan.name.clone(),
				graph: plan.graph.clone(),
				sequence,
			});
		}

		Ok(generated)
	}
}
