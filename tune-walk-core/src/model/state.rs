use log::warn;
use rand::Rng;

/// Outgoing transitions of a single token.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by relative likelihoods. Weights are not normalized:
/// `[(B, 3.0), (C, 1.0)]` and `[(B, 0.75), (C, 0.25)]` behave the same.
///
/// ## Responsibilities:
/// - Accumulate transitions while a graph is being built
/// - Predict the next token using weighted random sampling
///
/// ## Invariants
/// - Each target appears at most once (repeated edges are summed)
/// - Each weight is finite and strictly positive
/// - Transitions keep their insertion order, which fixes the mapping
///   from a random draw to a target
#[derive(Clone, Debug, PartialEq)]
pub struct State<T> {
	/// Outgoing transitions as `(target, weight)`.
	/// Example: [("IV", 0.3), ("V", 0.3), ("vi", 0.2)]
	transitions: Vec<(T, f64)>,
}

impl<T> Default for State<T> {
	fn default() -> Self {
		Self { transitions: Vec::new() }
	}
}

impl<T: PartialEq> State<T> {
	/// Creates a new state without outgoing transitions (a sink).
	pub fn new() -> Self {
		Self::default()
	}

	/// Records a transition toward `next` with the given weight.
	///
	/// - If the transition already exists, its weight is increased.
	/// - Otherwise, a new transition is appended.
	///
	/// Weight validation is the builder's job.
	pub(crate) fn add_transition(&mut self, next: T, weight: f64) {
		match self.transitions.iter_mut().find(|(target, _)| *target == next) {
			Some((_, existing)) => *existing += weight,
			None => self.transitions.push((next, weight)),
		}
	}

	/// Outgoing transitions in insertion order.
	pub fn transitions(&self) -> &[(T, f64)] {
		&self.transitions
	}

	/// Sum of all outgoing weights (0.0 for a sink).
	pub fn total_weight(&self) -> f64 {
		self.transitions.iter().map(|(_, weight)| weight).sum()
	}

	/// Weight of the transition toward `next`, if any.
	pub fn weight(&self, next: &T) -> Option<f64> {
		self.transitions
			.iter()
			.find(|(target, _)| target == next)
			.map(|(_, weight)| *weight)
	}

	/// `true` if no transition leaves this state.
	pub fn is_sink(&self) -> bool {
		self.transitions.is_empty()
	}

	/// Predicts the next token using weighted random sampling.
	///
	/// The probability of selecting a target is proportional to its weight.
	///
	/// This method performs:
	/// - one uniform draw in `[0, 1)` scaled by the total weight
	/// - an O(n) cumulative scan over the transitions
	///
	/// Returns `None` for a sink, without touching `rng`.
	pub fn predict<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&T> {
		if self.transitions.is_empty() {
			return None;
		}

		let total = self.total_weight();
		let target = rng.random::<f64>() * total;

		let mut cumulative = 0.0;
		for (next, weight) in &self.transitions {
			cumulative += weight;
			if cumulative > target {
				return Some(next);
			}
		}

		// Rounding can leave the running sum just below `target`.
		warn!("weighted draw {target} fell past total weight {total}, using last transition");
		self.transitions.last().map(|(next, _)| next)
	}
}
