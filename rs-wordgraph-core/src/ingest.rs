//! Turns raw text into connections of a `WeightedGraph`.
//!
//! Words are split on whitespace, normalized, and every pair of adjacent
//! non-empty words becomes one `add_connection(previous, current)` call.
//! The previous word carries over line boundaries.

use std::collections::HashMap;
use std::path::Path;
use std::sync::mpsc;
use std::thread;

use log::{debug, info};

use crate::error::{GraphError, Result};
use crate::io::{get_filename, read_file};
use crate::model::graph::WeightedGraph;

/// Below this many pairs, threads cost more than they save.
const PARALLEL_MIN_PAIRS: usize = 10_000;

/// Chunks handed out per CPU.
const CHUNKS_PER_CPU: usize = 8;

/// Removes bad formatting from a word.
///
/// The word is cut at its first character that is neither an ASCII letter,
/// a digit, `_` nor whitespace, then lowercased. `"Hello,"` becomes `"hello"`,
/// `"don't"` becomes `"don"` and `"!!!"` becomes the empty string.
pub fn normalize_word(word: &str) -> String {
	let end = word
		.find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c.is_whitespace()))
		.unwrap_or(word.len());
	word[..end].to_lowercase()
}

/// Splits lines into normalized words, dropping words that normalize to nothing.
///
/// Normalization results are memoized per distinct raw word.
pub fn normalize_lines<'a, I>(lines: I) -> Vec<String>
where
	I: IntoIterator<Item = &'a str>,
{
	let mut formatted: HashMap<&'a str, String> = HashMap::new();
	let mut words = Vec::new();

	for line in lines {
		for raw in line.split_whitespace() {
			let word = formatted.entry(raw).or_insert_with(|| normalize_word(raw));
			if !word.is_empty() {
				words.push(word.clone());
			}
		}
	}
	words
}

/// Adds a connection for every adjacent pair of `words`.
///
/// # Errors
/// Returns `GraphError::InvalidToken` on a word that is empty or contains
/// whitespace; `normalize_lines` never produces one.
pub fn add_sequence<S: AsRef<str>>(graph: &mut WeightedGraph, words: &[S]) -> Result<()> {
	for pair in words.windows(2) {
		graph.add_connection(pair[0].as_ref(), pair[1].as_ref())?;
	}
	Ok(())
}

/// Normalizes `text` and feeds it into `graph`.
pub fn ingest_text(graph: &mut WeightedGraph, text: &str) -> Result<()> {
	let words = normalize_lines(text.lines());
	add_sequence(graph, &words)
}

/// Builds a graph from normalized words, in parallel when the input is large.
pub fn build_graph(words: &[String]) -> Result<WeightedGraph> {
	if words.len().saturating_sub(1) < PARALLEL_MIN_PAIRS {
		let mut graph = WeightedGraph::new();
		add_sequence(&mut graph, words)?;
		return Ok(graph);
	}
	build_graph_parallel(words, num_cpus::get() * CHUNKS_PER_CPU)
}

/// Splits the pairs of `words` into `chunks` parts, builds one partial graph
/// per part on its own thread, and merges the partial graphs.
///
/// Consecutive parts share their boundary word, so each pair is counted
/// exactly once: the result equals a sequential build.
pub fn build_graph_parallel(words: &[String], chunks: usize) -> Result<WeightedGraph> {
	let pairs = words.len().saturating_sub(1);
	if pairs == 0 {
		return Ok(WeightedGraph::new());
	}
	let chunk_size = pairs.div_ceil(chunks.max(1));

	let (tx, rx) = mpsc::channel();
	let mut spawned = 0;
	for start in (0..pairs).step_by(chunk_size) {
		let end = (start + chunk_size).min(pairs);
		let tx = tx.clone();
		// pairs start..end need words start..=end
		let chunk: Vec<String> = words[start..=end].to_vec();

		thread::spawn(move || {
			let mut partial = WeightedGraph::new();
			let result = add_sequence(&mut partial, &chunk).map(|()| partial);
			if tx.send(result).is_err() {
				debug!("ingestion result for words {start}..={end} dropped, receiver gone");
			}
		});
		spawned += 1;
	}
	drop(tx);

	let mut graph = WeightedGraph::new();
	let mut received = 0;
	for partial in rx.iter() {
		graph.merge(&partial?);
		received += 1;
	}
	if received != spawned {
		return Err(GraphError::WorkerLost);
	}

	debug!("merged {received} partial graphs over {pairs} pairs");
	Ok(graph)
}

/// Reads a text file and builds its graph.
pub fn graph_from_file<P: AsRef<Path>>(path: P) -> Result<WeightedGraph> {
	let lines = read_file(&path)?;
	let words = normalize_lines(lines.iter().map(String::as_str));
	let graph = build_graph(&words)?;

	info!(
		"ingested {} words from '{}' into {} vertices",
		words.len(),
		get_filename(&path)?,
		graph.size()
	);
	Ok(graph)
}
