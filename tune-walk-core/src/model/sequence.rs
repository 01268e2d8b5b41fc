use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::GenerateError;

/// Ordered tokens produced by one walk.
///
/// A sequence always holds at least its start token. It may be shorter
/// than requested when the walk reached a sink; callers must accept that.
/// Deserializing an empty list fails.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(try_from = "Vec<T>", bound(deserialize = "T: Deserialize<'de>"))]
pub struct Sequence<T> {
	tokens: Vec<T>,
}

impl<T> Sequence<T> {
	/// Wraps tokens produced by the generator.
	pub(crate) fn new(tokens: Vec<T>) -> Self {
		Self { tokens }
	}

	/// Tokens in walk order.
	pub fn tokens(&self) -> &[T] {
		&self.tokens
	}

	pub fn len(&self) -> usize {
		self.tokens.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tokens.is_empty()
	}

	/// The start token of the walk.
	pub fn first(&self) -> Option<&T> {
		self.tokens.first()
	}

	/// The token the walk stopped on.
	pub fn last(&self) -> Option<&T> {
		self.tokens.last()
	}

	pub fn iter(&self) -> std::slice::Iter<'_, T> {
		self.tokens.iter()
	}

	/// Consumes the sequence and returns its tokens.
	pub fn into_tokens(self) -> Vec<T> {
		self.tokens
	}
}

impl<T> TryFrom<Vec<T>> for Sequence<T> {
	type Error = GenerateError;

	fn try_from(tokens: Vec<T>) -> Result<Self, Self::Error> {
		if tokens.is_empty() {
			return Err(GenerateError::InvalidLength(0));
		}
		Ok(Self { tokens })
	}
}

/// Serialized as the plain token list.
impl<T: Serialize> Serialize for Sequence<T> {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		self.tokens.serialize(serializer)
	}
}

impl<T> IntoIterator for Sequence<T> {
	type Item = T;
	type IntoIter = std::vec::IntoIter<T>;

	fn into_iter(self) -> Self::IntoIter {
		self.tokens.into_iter()
	}
}

impl<'a, T> IntoIterator for &'a Sequence<T> {
	type Item = &'a T;
	type IntoIter = std::slice::Iter<'a, T>;

	fn into_iter(self) -> Self::IntoIter {
		self.tokens.iter()
	}
}

/// Formats as `I -> IV -> V -> I`.
impl<T: fmt::Display> fmt::Display for Sequence<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, token) in self.tokens.iter().enumerate() {
			if i > 0 {
				f.write_str(" -> ")?;
			}
			write!(f, "{token}")?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn display_joins_with_arrows() {
		let sequence = Sequence::new(vec!["I", "IV", "V", "I"]);
		assert_eq!(sequence.to_string(), "I -> IV -> V -> I");
		assert_eq!(Sequence::new(vec!["i"]).to_string(), "i");
	}

	#[test]
	fn serializes_as_plain_list() {
		let sequence = Sequence::new(vec!["Bass".to_owned(), "Snare".to_owned()]);
		let json = serde_json::to_string(&sequence).unwrap();
		assert_eq!(json, r#"["Bass","Snare"]"#);
	}

	#[test]
	fn empty_list_does_not_deserialize() {
		assert!(serde_json::from_str::<Sequence<String>>("[]").is_err());

		let sequence: Sequence<String> = serde_json::from_str(r#"["I","V"]"#).unwrap();
		assert_eq!(sequence.first().map(String::as_str), Some("I"));
		assert_eq!(sequence.len(), 2);
	}
}
