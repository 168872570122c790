use serde::Serialize;

use super::graph::WeightedGraph;
use super::token::Token;
use super::vertex::VertexState;

/// One outgoing edge in a report, with its derived weight.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct EdgeReport {
	pub destination: Token,
	pub count: u64,
	pub weight: f64,
}

/// Snapshot of a vertex: its total and every edge, heaviest first.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct VertexReport {
	pub source: Token,
	pub total_count: u64,
	pub edges: Vec<EdgeReport>,
}

impl VertexReport {
	pub fn new(source: Token, vertex: &VertexState) -> Self {
		let total_count = vertex.total_count();
		let edges = vertex
			.ranked_edges()
			.map(|(destination, count)| EdgeReport {
				destination: destination.clone(),
				count,
				weight: count as f64 / total_count as f64,
			})
			.collect();
		Self { source, total_count, edges }
	}

	/// `source - d1 d2 ...` with every destination in rank order.
	pub fn summary(&self) -> String {
		let destinations: Vec<&str> = self.edges.iter().map(|e| e.destination.as_str()).collect();
		format!("{} - {}", self.source, destinations.join(" "))
	}
}

/// Reports for every vertex of `graph`, sorted by source.
pub fn graph_report(graph: &WeightedGraph) -> Vec<VertexReport> {
	let mut reports: Vec<VertexReport> = graph
		.iter()
		.map(|(source, vertex)| VertexReport::new(source.clone(), vertex))
		.collect();
	reports.sort_by(|a, b| a.source.cmp(&b.source));
	reports
}

/// Textual dump of the whole graph, one `source - destinations` line per vertex.
pub fn dump(graph: &WeightedGraph) -> String {
	graph_report(graph)
		.iter()
		.map(VertexReport::summary)
		.collect::<Vec<_>>()
		.join("\n")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn report_lists_edges_by_rank() {
		let mut graph = WeightedGraph::new();
		graph.add_connection("hello", "world").unwrap();
		graph.add_connection("hello", "its").unwrap();
		graph.add_connection("hello", "its").unwrap();
		graph.add_connection("hello", "its").unwrap();

		let report = VertexReport::new(Token::new("hello", "source").unwrap(), graph.vertex("hello").unwrap());
		assert_eq!(report.total_count, 4);
		assert_eq!(report.edges[0].destination, "its");
		assert_eq!(report.edges[0].count, 3);
		assert_eq!(report.edges[0].weight, 0.75);
		assert_eq!(report.edges[1].weight, 0.25);
		assert_eq!(report.summary(), "hello - its world");
	}

	#[test]
	fn dump_is_sorted_by_source() {
		let mut graph = WeightedGraph::new();
		graph.add_connection("b", "c").unwrap();
		graph.add_connection("a", "b").unwrap();
		graph.add_connection("a", "c").unwrap();
		assert_eq!(dump(&graph), "a - b c\nb - c");
		assert_eq!(dump(&WeightedGraph::new()), "");
	}
}
