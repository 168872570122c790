use std::str::FromStr;

use rand::Rng;

use super::graph::WeightedGraph;
use super::shared::SharedGraph;
use super::token::Token;
use crate::error::{GraphError, Result};
use crate::ingest::normalize_word;

/// How the next word is picked at each step of a walk.
///
/// # Variants
/// - `Random`: draw the next word with probability equal to its weight (`"all"`).
/// - `MostProbable`: always take the heaviest next word (`"one"`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerationMode {
	Random,
	MostProbable,
}

impl FromStr for GenerationMode {
	type Err = GraphError;

	fn from_str(s: &str) -> Result<Self> {
		match s.to_lowercase().as_str() {
			"all" => Ok(Self::Random),
			"one" => Ok(Self::MostProbable),
			_ => Err(GraphError::InvalidGenerationMode(s.to_owned())),
		}
	}
}

/// Anything a walk can query for the word following `current`.
///
/// Implemented by both the single-threaded and the shared graph so the same
/// generation loop serves the CLI and the server.
pub trait Walkable {
	fn most_probable(&self, current: &str) -> Option<Token>;

	fn draw<R: Rng + ?Sized>(&self, current: &str, rng: &mut R) -> Option<Token>;
}

impl Walkable for WeightedGraph {
	fn most_probable(&self, current: &str) -> Option<Token> {
		self.get_max(current)
	}

	fn draw<R: Rng + ?Sized>(&self, current: &str, rng: &mut R) -> Option<Token> {
		self.get_random_with(current, rng)
	}
}

impl Walkable for SharedGraph {
	fn most_probable(&self, current: &str) -> Option<Token> {
		self.get_max(current)
	}

	fn draw<R: Rng + ?Sized>(&self, current: &str, rng: &mut R) -> Option<Token> {
		self.get_random_with(current, rng)
	}
}

/// Upper bound on the number of words a single walk may produce.
pub const MAX_WORDS: usize = 100_000;

/// Parameters of one generation request.
///
/// # Invariants
/// - `seed` is already normalized and is a valid token
/// - `count <= MAX_WORDS`
#[derive(Clone, Debug)]
pub struct GenerationInput {
	seed: Token,

	/// Number of words to produce, the seed included.
	count: usize,

	pub mode: GenerationMode,
}

impl GenerationInput {
	/// Normalizes `seed` the same way ingested words are.
	///
	/// # Errors
	/// - `GraphError::InvalidArgument` if `count` exceeds `MAX_WORDS`.
	/// - `GraphError::InvalidToken` if the seed normalizes to nothing.
	pub fn new(seed: &str, count: usize, mode: GenerationMode) -> Result<Self> {
		if count > MAX_WORDS {
			return Err(GraphError::InvalidArgument(format!(
				"word count must be at most {MAX_WORDS}, got {count}"
			)));
		}
		let seed = Token::new(&normalize_word(seed), "seed")?;
		Ok(Self { seed, count, mode })
	}

	pub fn seed(&self) -> &Token {
		&self.seed
	}

	pub fn count(&self) -> usize {
		self.count
	}
}

/// Walks `graph` from the seed and returns exactly `input.count` words.
///
/// The first word is the seed. Every following word is queried from the
/// previous one; a dead end starts over from the seed.
pub fn generate<G, R>(graph: &G, input: &GenerationInput, rng: &mut R) -> Vec<Token>
where
	G: Walkable + ?Sized,
	R: Rng + ?Sized,
{
	let mut words = Vec::new();
	if input.count == 0 {
		return words;
	}

	let mut current = input.seed.clone();
	words.push(current.clone());
	while words.len() < input.count {
		let next = match input.mode {
			GenerationMode::Random => graph.draw(&current, rng),
			GenerationMode::MostProbable => graph.most_probable(&current),
		};
		current = next.unwrap_or_else(|| input.seed.clone());
		words.push(current.clone());
	}
	words
}

/// Same as `generate`, joined with single spaces.
pub fn generate_text<G, R>(graph: &G, input: &GenerationInput, rng: &mut R) -> String
where
	G: Walkable + ?Sized,
	R: Rng + ?Sized,
{
	let words = generate(graph, input, rng);
	words.iter().map(Token::as_str).collect::<Vec<_>>().join(" ")
}
