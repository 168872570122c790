//! Property tests for the weighted graph against a naive reference.

use std::collections::HashMap;

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rs_wordgraph_core::{Token, WeightedGraph};

/// Linear-scan reference: destination -> count for every source.
fn reference(pairs: &[(String, String)]) -> HashMap<String, HashMap<String, u64>> {
	let mut counts: HashMap<String, HashMap<String, u64>> = HashMap::new();
	for (source, destination) in pairs {
		*counts.entry(source.clone()).or_default().entry(destination.clone()).or_default() += 1;
	}
	counts
}

/// Every edge sorted by count descending, destination ascending.
fn reference_ranking(edges: &HashMap<String, u64>) -> Vec<String> {
	let mut ranked: Vec<(&String, &u64)> = edges.iter().collect();
	ranked.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
	ranked.into_iter().map(|(destination, _)| destination.clone()).collect()
}

fn build(pairs: &[(String, String)]) -> WeightedGraph {
	let mut graph = WeightedGraph::new();
	for (source, destination) in pairs {
		graph.add_connection(source, destination).unwrap();
	}
	graph
}

fn strings(tokens: &[Token]) -> Vec<String> {
	tokens.iter().map(Token::to_string).collect()
}

/// Small vocabulary so that sources repeat and counts tie often.
fn pairs_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
	let word = prop::sample::select(vec!["a", "b", "c", "d", "e", "f", "g"]).prop_map(str::to_owned);
	prop::collection::vec((word.clone(), word), 0..200)
}

proptest! {
	#[test]
	fn totals_match_counts_and_weights_sum_to_one(pairs in pairs_strategy()) {
		let graph = build(&pairs);
		for (_, vertex) in graph.iter() {
			let sum: u64 = vertex.edges().map(|edge| edge.count()).sum();
			prop_assert_eq!(sum, vertex.total_count());

			let weights: f64 = vertex.edges().map(|edge| vertex.weight(edge.destination()).unwrap()).sum();
			prop_assert!((weights - 1.0).abs() < 1e-9);
			prop_assert!(vertex.is_consistent());
		}
	}

	#[test]
	fn counts_match_reference(pairs in pairs_strategy()) {
		let graph = build(&pairs);
		let expected = reference(&pairs);
		prop_assert_eq!(graph.size(), expected.len());
		for (source, edges) in &expected {
			let vertex = graph.vertex(source).unwrap();
			prop_assert_eq!(vertex.out_degree(), edges.len());
			for (destination, count) in edges {
				prop_assert_eq!(vertex.count(destination), Some(*count));
			}
		}
	}

	#[test]
	fn max_matches_linear_scan(pairs in pairs_strategy()) {
		let graph = build(&pairs);
		for (source, edges) in reference(&pairs) {
			let expected = reference_ranking(&edges).into_iter().next();
			prop_assert_eq!(graph.get_max(&source).map(|t| t.to_string()), expected);
		}
	}

	#[test]
	fn top_k_is_a_sorted_prefix(pairs in pairs_strategy(), k in 0usize..10) {
		let graph = build(&pairs);
		for (source, edges) in reference(&pairs) {
			let full = strings(&graph.get_top_k(&source, edges.len()));
			prop_assert_eq!(&full, &reference_ranking(&edges));

			let top = strings(&graph.get_top_k(&source, k));
			prop_assert_eq!(top.len(), k.min(edges.len()));
			prop_assert_eq!(&top[..], &full[..top.len()]);
		}
	}

	#[test]
	fn reads_do_not_change_the_graph(pairs in pairs_strategy(), seed in any::<u64>()) {
		let graph = build(&pairs);
		let mut rng = StdRng::seed_from_u64(seed);
		let before: Vec<(String, u64, Vec<String>)> = graph
			.vertices()
			.iter()
			.map(|source| {
				let vertex = graph.vertex(source).unwrap();
				(source.to_string(), vertex.total_count(), strings(&graph.get_top_k(source, usize::MAX)))
			})
			.collect();

		for (source, _, _) in &before {
			for _ in 0..5 {
				let _ = graph.get_max(source);
				let _ = graph.get_random_with(source, &mut rng);
				let _ = graph.get_top_k(source, 3);
			}
		}

		for (source, total, ranking) in &before {
			let vertex = graph.vertex(source).unwrap();
			prop_assert_eq!(vertex.total_count(), *total);
			prop_assert_eq!(&strings(&graph.get_top_k(source, usize::MAX)), ranking);
			prop_assert!(vertex.is_consistent());
		}
	}

	#[test]
	fn random_draws_follow_existing_edges(pairs in pairs_strategy(), seed in any::<u64>()) {
		let graph = build(&pairs);
		let mut rng = StdRng::seed_from_u64(seed);
		for source in graph.vertices() {
			let vertex = graph.vertex(&source).unwrap();
			for _ in 0..10 {
				let drawn = graph.get_random_with(&source, &mut rng).unwrap();
				prop_assert!(vertex.count(&drawn).is_some());
			}
		}
	}
}

#[test]
fn empirical_frequencies_converge_to_weights() {
	let mut graph = WeightedGraph::new();
	for (destination, times) in [("half", 3), ("third", 2), ("sixth", 1)] {
		for _ in 0..times {
			graph.add_connection("start", destination).unwrap();
		}
	}

	let draws = 100_000;
	let mut rng = StdRng::seed_from_u64(0x5eed);
	let mut seen: HashMap<String, usize> = HashMap::new();
	for _ in 0..draws {
		let token = graph.get_random_with("start", &mut rng).unwrap();
		*seen.entry(token.to_string()).or_default() += 1;
	}

	for (destination, expected) in [("half", 1.0 / 2.0), ("third", 1.0 / 3.0), ("sixth", 1.0 / 6.0)] {
		let observed = seen.get(destination).copied().unwrap_or(0) as f64 / draws as f64;
		assert!(
			(observed - expected).abs() < 0.02,
			"{destination}: observed {observed}, expected {expected}"
		);
	}
}

#[test]
fn weights_move_as_counts_grow() {
	let mut graph = WeightedGraph::new();
	graph.add_connection("a", "x").unwrap();
	graph.add_connection("a", "y").unwrap();
	assert_eq!(graph.get_max("a").as_deref(), Some("x"));

	for expected_y in 2..6u64 {
		graph.add_connection("a", "y").unwrap();
		let vertex = graph.vertex("a").unwrap();
		assert_eq!(vertex.count("y"), Some(expected_y));
		assert_eq!(vertex.weight("y"), Some(expected_y as f64 / (expected_y + 1) as f64));
		assert_eq!(graph.get_top_k("a", 2), ["y", "x"]);
	}
}

#[test]
fn unknown_tokens_on_an_empty_graph() {
	let graph = WeightedGraph::new();
	assert_eq!(graph.get_random("x"), None);
	assert_eq!(graph.get_max("x"), None);
	assert!(graph.get_top_k("x", 5).is_empty());
	assert!(graph.vertices().is_empty());
}
