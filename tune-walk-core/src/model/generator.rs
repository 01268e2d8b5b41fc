use log::debug;
use rand::Rng;

use super::Token;
use super::sequence::Sequence;
use super::transition_graph::TransitionGraph;
use crate::error::GenerateError;

/// Walks `graph` from `start` and returns at most `length` tokens.
///
/// # Parameters
/// - `graph`: Read-only transition graph.
/// - `start`: First token of the walk; must be a node of `graph`.
/// - `length`: Maximum number of tokens, start included (>= 1).
/// - `rng`: Random source. Seed it to reproduce a walk.
///
/// # Behavior
/// - The result starts with `start`.
/// - Each further step picks one outgoing edge of the current token with
///   probability proportional to its weight (one draw from `rng`).
/// - The walk stops after `length` tokens, or as soon as the current
///   token is a sink. A sink-terminated sequence is not an error.
///
/// # Errors
/// - `GenerateError::InvalidLength` if `length == 0` (checked first).
/// - `GenerateError::InvalidStart` if `start` is not a node of `graph`.
pub fn generate<T, R>(
	graph: &TransitionGraph<T>,
	start: &T,
	length: usize,
	rng: &mut R,
) -> Result<Sequence<T>, GenerateError>
where
	T: Token,
	R: Rng + ?Sized,
{
	if length < 1 {
		return Err(GenerateError::InvalidLength(length));
	}
	if !graph.contains(start) {
		return Err(GenerateError::InvalidStart(format!("{start:?}")));
	}

	let mut tokens = Vec::new();
	tokens.push(start.clone());

	let mut current = start;
	while tokens.len() < length {
		let Some(next) = graph.state(current).and_then(|state| state.predict(&mut *rng)) else {
			debug!("walk reached sink {current:?} after {} tokens", tokens.len());
			break;
		};
		tokens.push(next.clone());
		current = next;
	}

	debug!("generated {}/{} tokens from {start:?}", tokens.len(), length);
	Ok(Sequence::new(tokens))
}

/// Same as `generate`, drawing from the thread-local, unseeded generator.
pub fn generate_with_entropy<T: Token>(
	graph: &TransitionGraph<T>,
	start: &T,
	length: usize,
) -> Result<Sequence<T>, GenerateError> {
	generate(graph, start, length, &mut rand::rng())
}
