use std::env;
use std::process::ExitCode;

use log::error;
use rs_wordgraph_core::ingest::{graph_from_file, normalize_word};
use rs_wordgraph_core::model::report::dump;
use rs_wordgraph_core::{GenerationInput, GenerationMode, GraphError, Token, WeightedGraph, generate_text};

const USAGE: &str = "usage:
  rs-wordgraph-cli <file>                          print every word with its successors
  rs-wordgraph-cli <file> <seed> <k>               print the k most probable successors of seed
  rs-wordgraph-cli <file> <seed> <count> <all|one> generate count words starting from seed";

/// What the command line asked for.
#[derive(Debug, PartialEq)]
enum Command {
	Dump,
	MostProbable { seed: String, k: i64 },
	Generate { seed: String, count: i64, mode: GenerationMode },
}

/// Parses everything after the file argument.
///
/// Negative `k` and `count` are accepted here and print nothing.
fn parse_command(args: &[String]) -> Result<Command, GraphError> {
	match args {
		[] => Ok(Command::Dump),
		[seed, k] => {
			let k = k
				.parse::<i64>()
				.map_err(|_| GraphError::InvalidArgument(format!("k must be an integer, got '{k}'")))?;
			Ok(Command::MostProbable { seed: seed.clone(), k })
		}
		[seed, count, mode] => {
			let count = count
				.parse::<i64>()
				.map_err(|_| GraphError::InvalidArgument(format!("count must be an integer, got '{count}'")))?;
			Ok(Command::Generate { seed: seed.clone(), count, mode: mode.parse()? })
		}
		_ => Err(GraphError::InvalidArgument(format!("expected 1, 3 or 4 arguments, got {}", args.len() + 1))),
	}
}

fn run(graph: &WeightedGraph, command: Command) -> Result<String, GraphError> {
	match command {
		Command::Dump => Ok(dump(graph)),
		Command::MostProbable { seed, k } => {
			// negative k lists nothing
			let k = usize::try_from(k).unwrap_or(0);
			let words = graph.get_top_k(&normalize_word(&seed), k);
			Ok(words.iter().map(Token::as_str).collect::<Vec<_>>().join(" "))
		}
		Command::Generate { seed, count, mode } => {
			let count = usize::try_from(count).unwrap_or(0);
			let input = GenerationInput::new(&seed, count, mode)?;
			Ok(generate_text(graph, &input, &mut rand::rng()))
		}
	}
}

fn main() -> ExitCode {
	env_logger::init();

	let args: Vec<String> = env::args().skip(1).collect();
	let Some((file, rest)) = args.split_first() else {
		eprintln!("{USAGE}");
		return ExitCode::FAILURE;
	};

	let command = match parse_command(rest) {
		Ok(command) => command,
		Err(e) => {
			eprintln!("{e}\n{USAGE}");
			return ExitCode::FAILURE;
		}
	};

	let result = graph_from_file(file).and_then(|graph| run(&graph, command));
	match result {
		Ok(output) => {
			println!("{output}");
			ExitCode::SUCCESS
		}
		Err(e) => {
			error!("{file}: {e}");
			eprintln!("{e}");
			ExitCode::FAILURE
		}
	}
}
