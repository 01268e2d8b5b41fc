use thiserror::Error;

/// Failures of a single walk over a transition graph.
///
/// Both variants are caller errors: they are reported immediately and
/// never retried. A walk that stops early on a sink is not an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerateError {
	#[error("start token {0} is not a node of the graph")]
	InvalidStart(String),

	#[error("sequence length must be at least 1, got {0}")]
	InvalidLength(usize),
}

/// Failures while building a graph or registering it in a library.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GraphError {
	#[error("edge {from} -> {to} has invalid weight {weight} (must be finite and > 0)")]
	InvalidWeight { from: String, to: String, weight: f64 },

	#[error("default start token {0} is not a node of the graph")]
	UnknownStart(String),
}

/// Any error surfaced by the library.
#[derive(Debug, Error)]
pub enum Error {
	#[error(transparent)]
	Generate(#[from] GenerateError),

	#[error(transparent)]
	Graph(#[from] GraphError),

	#[error("unknown section: {0}")]
	UnknownSection(String),

	#[error("no MIDI mapping for token {token} in {context}")]
	UnknownToken { token: String, context: String },

	#[error("tempo must be between 4 and 1000 BPM, got {0}")]
	InvalidTempo(u32),

	#[error("rhyme scheme {0:?} is empty or names a group without phrases")]
	InvalidRhymeScheme(String),

	#[error("no lyric lines to arrange")]
	EmptyLyrics,

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("invalid song plan: {0}")]
	Plan(#[from] serde_json::Error),
}
