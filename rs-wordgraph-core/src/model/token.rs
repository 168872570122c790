use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::error::{GraphError, Result};

/// An immutable, normalized word used as a vertex identifier.
///
/// Cloning is cheap: the text is shared between the edge table of a
/// vertex, its lookup map and its order index.
///
/// ## Invariants
/// - The text is never empty
/// - The text contains no whitespace
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(Arc<str>);

impl Token {
	/// Validates `text` and wraps it into a token.
	///
	/// `role` names the argument in the error ("source", "destination", "seed").
	///
	/// # Errors
	/// Returns `GraphError::InvalidToken` if `text` is empty or contains whitespace.
	pub fn new(text: &str, role: &'static str) -> Result<Self> {
		if text.is_empty() || text.chars().any(char::is_whitespace) {
			return Err(GraphError::InvalidToken { role, token: text.to_owned() });
		}
		Ok(Self(Arc::from(text)))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl Deref for Token {
	type Target = str;

	fn deref(&self) -> &str {
		&self.0
	}
}

impl Borrow<str> for Token {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl AsRef<str> for Token {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl PartialEq<str> for Token {
	fn eq(&self, other: &str) -> bool {
		&*self.0 == other
	}
}

impl PartialEq<&str> for Token {
	fn eq(&self, other: &&str) -> bool {
		&*self.0 == *other
	}
}

impl fmt::Display for Token {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl fmt::Debug for Token {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(&*self.0, f)
	}
}

impl Serialize for Token {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn accepts_plain_words() {
		let token = Token::new("hello", "source").unwrap();
		assert_eq!(token, "hello");
		assert_eq!(token.to_string(), "hello");
	}

	#[test]
	fn rejects_empty_and_whitespace() {
		assert!(matches!(
			Token::new("", "source"),
			Err(GraphError::InvalidToken { role: "source", .. })
		));
		assert!(Token::new("two words", "destination").is_err());
		assert!(Token::new("tab\there", "destination").is_err());
		assert!(Token::new("\n", "seed").is_err());
	}

	#[test]
	fn orders_lexicographically() {
		let a = Token::new("apple", "source").unwrap();
		let b = Token::new("banana", "source").unwrap();
		assert!(a < b);
	}
}
