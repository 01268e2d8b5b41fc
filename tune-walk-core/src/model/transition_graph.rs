use std::collections::HashMap;

use super::Token;
use super::state::State;
use crate::error::GraphError;

/// Directed, edge-weighted graph over tokens.
///
/// A `TransitionGraph` maps every node to its outgoing `State`. It is
/// built once through `TransitionGraphBuilder` and is read-only afterwards,
/// so a single graph can be shared by any number of concurrent walks.
///
/// # Invariants
/// - Every edge target is itself a node (possibly a sink)
/// - Every edge weight is finite and strictly positive
/// - `nodes()` yields tokens in the order they were first mentioned
#[derive(Clone, Debug)]
pub struct TransitionGraph<T> {
	/// Insertion order of the nodes.
	order: Vec<T>,
	/// Outgoing transitions indexed by source token.
	states: HashMap<T, State<T>>,
}

impl<T: Token> TransitionGraph<T> {
	/// Builds a graph from `(from, to, weight)` triples.
	///
	/// # Errors
	/// Returns an error on the first invalid weight.
	pub fn from_edges<I>(edges: I) -> Result<Self, GraphError>
	where
		I: IntoIterator<Item = (T, T, f64)>,
	{
		let mut builder = TransitionGraphBuilder::new();
		builder.add_edges(edges)?;
		Ok(builder.build())
	}

	/// Returns `true` if `token` is a node of the graph.
	pub fn contains(&self, token: &T) -> bool {
		self.states.contains_key(token)
	}

	/// Nodes in insertion order.
	pub fn nodes(&self) -> impl Iterator<Item = &T> {
		self.order.iter()
	}

	/// Outgoing state of `token`, or `None` if it is not a node.
	pub fn state(&self, token: &T) -> Option<&State<T>> {
		self.states.get(token)
	}

	/// Outgoing edges of `token` as `(target, weight)`.
	///
	/// Unknown tokens and sinks both yield an empty slice.
	pub fn edges(&self, token: &T) -> &[(T, f64)] {
		self.states.get(token).map(State::transitions).unwrap_or(&[])
	}

	/// Total outgoing weight of `token`.
	pub fn out_weight(&self, token: &T) -> f64 {
		self.states.get(token).map(State::total_weight).unwrap_or(0.0)
	}

	/// Probability of walking `from -> to` in one step.
	///
	/// Edge weight divided by the total outgoing weight of `from`;
	/// 0.0 if the edge does not exist.
	pub fn probability(&self, from: &T, to: &T) -> f64 {
		let Some(state) = self.states.get(from) else {
			return 0.0;
		};
		match state.weight(to) {
			Some(weight) => weight / state.total_weight(),
			None => 0.0,
		}
	}

	/// `true` if `token` is a node without outgoing edges.
	pub fn is_sink(&self, token: &T) -> bool {
		self.states.get(token).is_some_and(State::is_sink)
	}

	/// Number of nodes.
	pub fn node_count(&self) -> usize {
		self.order.len()
	}

	/// Number of distinct edges (repeated edges count once).
	pub fn edge_count(&self) -> usize {
		self.states.values().map(|state| state.transitions().len()).sum()
	}
}

/// Incremental constructor for `TransitionGraph`.
///
/// Replaces module-level graph tables: callers describe nodes and edges,
/// then freeze the result with `build`.
///
/// ```
/// use tune_walk_core::model::transition_graph::TransitionGraphBuilder;
///
/// let mut builder = TransitionGraphBuilder::new();
/// builder
/// 	.add_edge("V", "I", 0.5).unwrap()
/// 	.add_edge("V", "vi", 0.3).unwrap();
/// let graph = builder.build();
/// assert!(graph.is_sink(&"I"));
/// ```
#[derive(Clone, Debug)]
pub struct TransitionGraphBuilder<T> {
	order: Vec<T>,
	states: HashMap<T, State<T>>,
}

impl<T: Token> Default for TransitionGraphBuilder<T> {
	fn default() -> Self {
		Self { order: Vec::new(), states: HashMap::new() }
	}
}

impl<T: Token> TransitionGraphBuilder<T> {
	/// Creates an empty builder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a node without edges. Adding an existing node does nothing.
	pub fn add_node(&mut self, token: T) -> &mut Self {
		if !self.states.contains_key(&token) {
			self.order.push(token.clone());
			self.states.insert(token, State::new());
		}
		self
	}

	/// Adds a weighted edge `from -> to`.
	///
	/// - Both endpoints become nodes.
	/// - Adding an edge that already exists adds `weight` to it.
	///
	/// # Errors
	/// Returns `GraphError::InvalidWeight` if `weight` is not finite or
	/// not strictly positive. The builder is left unchanged.
	pub fn add_edge(&mut self, from: T, to: T, weight: f64) -> Result<&mut Self, GraphError> {
		if !weight.is_finite() || weight <= 0.0 {
			return Err(GraphError::InvalidWeight {
				from: format!("{from:?}"),
				to: format!("{to:?}"),
				weight,
			});
		}

		self.add_node(from.clone());
		self.add_node(to.clone());
		if let Some(state) = self.states.get_mut(&from) {
			state.add_transition(to, weight);
		}
		Ok(self)
	}

	/// Adds every `(from, to, weight)` triple in order.
	///
	/// # Errors
	/// Stops at the first invalid weight; edges before it are kept.
	pub fn add_edges<I>(&mut self, edges: I) -> Result<&mut Self, GraphError>
	where
		I: IntoIterator<Item = (T, T, f64)>,
	{
		for (from, to, weight) in edges {
			self.add_edge(from, to, weight)?;
		}
		Ok(self)
	}

	/// Freezes the builder into an immutable graph.
	pub fn build(self) -> TransitionGraph<T> {
		TransitionGraph { order: self.order, states: self.states }
	}
}
