use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use rand::Rng;

use super::graph::WeightedGraph;
use super::report::VertexReport;
use super::token::Token;
use super::vertex::VertexState;
use crate::error::Result;

type VertexHandle = Arc<Mutex<VertexState>>;

/// A `WeightedGraph` that can be shared between threads.
///
/// Each vertex sits behind its own mutex. The map lock is only held to find
/// or create a vertex handle, so writers to one source never block readers of
/// another. A reader locks the vertex it queries, which means it sees either
/// all or none of a concurrent `add_connection` on that vertex.
///
/// Random draws use the calling thread's generator or an injected one; no
/// generator state is shared.
#[derive(Debug, Default)]
pub struct SharedGraph {
	vertices: RwLock<HashMap<Token, VertexHandle>>,
}

impl SharedGraph {
	pub fn new() -> Self {
		Self::default()
	}

	fn handle(&self, source: &str) -> Option<VertexHandle> {
		self.vertices.read().get(source).cloned()
	}

	/// Adds one occurrence of `source -> destination`, see `WeightedGraph::add_connection`.
	///
	/// # Errors
	/// Returns `GraphError::InvalidToken` on an empty or whitespace token.
	pub fn add_connection(&self, source: &str, destination: &str) -> Result<()> {
		let destination = Token::new(destination, "destination")?;
		let vertex = match self.handle(source) {
			Some(vertex) => vertex,
			None => {
				let source = Token::new(source, "source")?;
				// Another writer may have created it between the two locks
				self.vertices.write().entry(source).or_default().clone()
			}
		};
		vertex.lock().add_transition(&destination);
		Ok(())
	}

	pub fn get_max(&self, source: &str) -> Option<Token> {
		let vertex = self.handle(source)?;
		let state = vertex.lock();
		state.max_destination().cloned()
	}

	pub fn get_random(&self, source: &str) -> Option<Token> {
		self.get_random_with(source, &mut rand::rng())
	}

	pub fn get_random_with<R: Rng + ?Sized>(&self, source: &str, rng: &mut R) -> Option<Token> {
		let vertex = self.handle(source)?;
		let state = vertex.lock();
		state.random_destination(rng).cloned()
	}

	pub fn get_top_k(&self, source: &str, k: usize) -> Vec<Token> {
		match self.handle(source) {
			Some(vertex) => vertex.lock().top_destinations(k).cloned().collect(),
			None => Vec::new(),
		}
	}

	/// Snapshot of every source token.
	pub fn vertices(&self) -> BTreeSet<Token> {
		self.vertices.read().keys().cloned().collect()
	}

	pub fn size(&self) -> usize {
		self.vertices.read().len()
	}

	/// Consistent snapshot of one vertex.
	pub fn report(&self, source: &str) -> Option<VertexReport> {
		let vertex = self.handle(source)?;
		let state = vertex.lock();
		let source = Token::new(source, "source").ok()?;
		Some(VertexReport::new(source, &state))
	}

	/// Merges a privately built graph into the shared one.
	///
	/// Vertices are merged one at a time; readers may observe some vertices
	/// already merged and others not yet, but never a half-merged vertex.
	pub fn absorb(&self, graph: WeightedGraph) {
		for (source, incoming) in graph {
			let existing = self.handle(&source);
			match existing {
				Some(vertex) => vertex.lock().merge(&incoming),
				None => {
					let mut map = self.vertices.write();
					match map.get(&source) {
						Some(vertex) => vertex.lock().merge(&incoming),
						None => {
							map.insert(source, Arc::new(Mutex::new(incoming)));
						}
					}
				}
			}
		}
	}

	/// Copies the shared graph into a plain `WeightedGraph`.
	pub fn snapshot(&self) -> WeightedGraph {
		let handles: Vec<(Token, VertexHandle)> = self
			.vertices
			.read()
			.iter()
			.map(|(source, vertex)| (source.clone(), vertex.clone()))
			.collect();

		let mut graph = WeightedGraph::new();
		for (source, vertex) in handles {
			graph.insert_vertex(source, vertex.lock().clone());
		}
		graph
	}
}

impl From<WeightedGraph> for SharedGraph {
	fn from(graph: WeightedGraph) -> Self {
		let vertices = graph
			.into_iter()
			.map(|(source, vertex)| (source, Arc::new(Mutex::new(vertex))))
			.collect();
		Self { vertices: RwLock::new(vertices) }
	}
}
