use std::collections::BTreeMap;

use rand::Rng;

use super::Token;
use super::generator::generate;
use super::sequence::Sequence;
use super::transition_graph::TransitionGraph;
use crate::error::{Error, GraphError};

/// A graph together with the token walks start from by default.
///
/// # Invariants
/// - `default_start` is a node of `graph`
#[derive(Clone, Debug)]
pub struct Section<T> {
	graph: TransitionGraph<T>,
	default_start: T,
}

impl<T: Token> Section<T> {
	/// # Errors
	/// Returns `GraphError::UnknownStart` if `default_start` is not a node.
	pub fn new(graph: TransitionGraph<T>, default_start: T) -> Result<Self, GraphError> {
		if !graph.contains(&default_start) {
			return Err(GraphError::UnknownStart(format!("{default_start:?}")));
		}
		Ok(Self { graph, default_start })
	}

	pub fn graph(&self) -> &TransitionGraph<T> {
		&self.graph
	}

	pub fn default_start(&self) -> &T {
		&self.default_start
	}
}

/// Named sections ("C", "Am", "drums", ...) owned by the caller.
///
/// The library selects which graph and which default start token a
/// generation uses. It never mutates a graph once inserted.
#[derive(Clone, Debug)]
pub struct GraphLibrary<T> {
	sections: BTreeMap<String, Section<T>>,
}

impl<T> Default for GraphLibrary<T> {
	fn default() -> Self {
		Self { sections: BTreeMap::new() }
	}
}

impl<T: Token> GraphLibrary<T> {
	/// Creates an empty library.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `graph` under `key`, replacing any previous section.
	///
	/// # Errors
	/// Returns `GraphError::UnknownStart` if `default_start` is not a node.
	pub fn insert(&mut self, key: &str, graph: TransitionGraph<T>, default_start: T) -> Result<(), GraphError> {
		let section = Section::new(graph, default_start)?;
		self.sections.insert(key.to_owned(), section);
		Ok(())
	}

	/// Returns the section registered under `key`.
	pub fn get(&self, key: &str) -> Option<&Section<T>> {
		self.sections.get(key)
	}

	/// Section keys in sorted order.
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.sections.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.sections.len()
	}

	pub fn is_empty(&self) -> bool {
		self.sections.is_empty()
	}

	/// Moves every section of `other` into this library.
	///
	/// Sections of `other` replace sections with the same key.
	pub fn merge(&mut self, other: Self) {
		self.sections.extend(other.sections);
	}

	/// Generates a sequence from the section registered under `key`.
	///
	/// # Parameters
	/// - `key`: Section name.
	/// - `length`: Maximum number of tokens (>= 1).
	/// - `start`: Explicit start token, or `None` for the section default.
	/// - `rng`: Random source.
	///
	/// # Errors
	/// - `Error::UnknownSection` if `key` is not registered.
	/// - `Error::Generate` for an invalid length or start token.
	pub fn generate_section<R: Rng + ?Sized>(
		&self,
		key: &str,
		length: usize,
		start: Option<&T>,
		rng: &mut R,
	) -> Result<Sequence<T>, Error> {
		let section = self.get(key).ok_or_else(|| Error::UnknownSection(key.to_owned()))?;
		let start = start.unwrap_or(&section.default_start);
		Ok(generate(&section.graph, start, length, rng)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::GenerateError;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn library() -> GraphLibrary<&'static str> {
		let major = TransitionGraph::from_edges([("I", "V", 1.0), ("V", "I", 1.0)]).unwrap();
		let minor = TransitionGraph::from_edges([("i", "v", 1.0)]).unwrap();

		let mut library = GraphLibrary::new();
		library.insert("C", major, "I").unwrap();
		library.insert("Am", minor, "i").unwrap();
		library
	}

	#[test]
	fn default_start_is_used_when_none_given() {
		let library = library();
		let mut rng = StdRng::seed_from_u64(9);
		let sequence = library.generate_section("C", 4, None, &mut rng).unwrap();
		assert_eq!(sequence.tokens(), &["I", "V", "I", "V"]);

		let sequence = library.generate_section("C", 3, Some(&"V"), &mut rng).unwrap();
		assert_eq!(sequence.tokens(), &["V", "I", "V"]);

		let sequence = library.generate_section("Am", 4, None, &mut rng).unwrap();
		assert_eq!(sequence.tokens(), &["i", "v"]);
	}

	#[test]
	fn keys_are_sorted() {
		let library = library();
		assert_eq!(library.keys().collect::<Vec<_>>(), ["Am", "C"]);
		assert_eq!(library.len(), 2);
	}

	#[test]
	fn unknown_section_and_start_are_errors() {
		let library = library();
		let mut rng = StdRng::seed_from_u64(9);
		assert!(matches!(
			library.generate_section("G", 4, None, &mut rng),
			Err(Error::UnknownSection(key)) if key == "G"
		));
		assert!(matches!(
			library.generate_section("Am", 4, Some(&"I"), &mut rng),
			Err(Error::Generate(GenerateError::InvalidStart(_)))
		));
		assert!(matches!(
			library.generate_section("Am", 0, None, &mut rng),
			Err(Error::Generate(GenerateError::InvalidLength(0)))
		));
	}

	#[test]
	fn default_start_must_be_a_node() {
		let graph = TransitionGraph::from_edges([("I", "V", 1.0)]).unwrap();
		let mut library = GraphLibrary::new();
		assert_eq!(
			library.insert("C", graph, "ii"),
			Err(GraphError::UnknownStart("\"ii\"".to_owned()))
		);
		assert!(library.is_empty());
	}

	#[test]
	fn merge_replaces_same_keys() {
		let mut library = library();
		let mut other = GraphLibrary::new();
		other
			.insert("C", TransitionGraph::from_edges([("IV", "I", 1.0)]).unwrap(), "IV")
			.unwrap();
		library.merge(other);
		assert_eq!(library.get("C").map(|section| *section.default_start()), Some("IV"));
		assert_eq!(library.len(), 2);
	}
}
