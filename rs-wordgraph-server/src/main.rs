use std::env;
use std::path::PathBuf;

use actix_web::{get, put, web, App, HttpResponse, HttpServer, Responder};

use log::{info, warn};
use serde::Deserialize;
use rs_wordgraph_core::io::{list_files, normalize_folder};
use rs_wordgraph_core::ingest::{graph_from_file, normalize_word};
use rs_wordgraph_core::{GenerationInput, GenerationMode, SharedGraph, generate_text};

/// Server settings, read from the environment.
///
/// - `WORDGRAPH_HOST` (default `127.0.0.1`)
/// - `WORDGRAPH_PORT` (default `5000`)
/// - `WORDGRAPH_DATA`: folder holding the `.txt` corpora (default `./data`)
#[derive(Debug, Clone)]
struct ServerConfig {
	host: String,
	port: u16,
	data_dir: PathBuf,
}

impl ServerConfig {
	fn from_env() -> Result<Self, String> {
		let host = env::var("WORDGRAPH_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
		let port = match env::var("WORDGRAPH_PORT") {
			Ok(value) => value
				.parse::<u16>()
				.map_err(|_| format!("WORDGRAPH_PORT must be a port number, got '{value}'"))?,
			Err(_) => 5000,
		};
		let data_dir = normalize_folder(&env::var("WORDGRAPH_DATA").unwrap_or_else(|_| "./data".to_owned()));
		Ok(Self { host, port, data_dir })
	}
}

/// Struct representing query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	seed: String,
	count: Option<usize>,
	mode: Option<String>, // "all" (random walk) or "one" (most probable)
}

#[derive(Deserialize)]
struct SourceQuery {
	source: String,
}

#[derive(Deserialize)]
struct TopKQuery {
	source: String,
	k: Option<i64>,
}

#[derive(Deserialize)]
struct CorpusQuery {
	names: Option<String>,
}

impl GenerateParams {
	/// Validates the request into generation settings.
	fn generation_input(&self) -> Result<GenerationInput, String> {
		let mode = match &self.mode {
			None => GenerationMode::Random,
			Some(mode) => mode.parse::<GenerationMode>().map_err(|e| e.to_string())?,
		};
		GenerationInput::new(&self.seed, self.count.unwrap_or(20), mode).map_err(|e| e.to_string())
	}
}

/// HTTP GET endpoint `/v1/generate`
///
/// Walks the graph from the seed and returns the generated words,
/// separated by single spaces. A `count` above `MAX_WORDS` is a bad request.
#[get("/v1/generate")]
async fn get_generated(graph: web::Data<SharedGraph>, query: web::Query<GenerateParams>) -> impl Responder {
	let input = match query.generation_input() {
		Ok(input) => input,
		Err(e) => return HttpResponse::BadRequest().body(e),
	};
	HttpResponse::Ok().body(generate_text(graph.get_ref(), &input, &mut rand::rng()))
}

#[get("/v1/max")]
async fn get_max(graph: web::Data<SharedGraph>, query: web::Query<SourceQuery>) -> impl Responder {
	match graph.get_max(&normalize_word(&query.source)) {
		Some(token) => HttpResponse::Ok().body(token.to_string()),
		None => HttpResponse::NotFound().body(format!("No connection from '{}'", query.source)),
	}
}

/// HTTP GET endpoint `/v1/top_k`
///
/// A missing `k` returns every destination; a negative one returns none.
#[get("/v1/top_k")]
async fn get_top_k(graph: web::Data<SharedGraph>, query: web::Query<TopKQuery>) -> impl Responder {
	let k = match query.k {
		Some(k) => usize::try_from(k).unwrap_or(0),
		None => usize::MAX,
	};
	HttpResponse::Ok().json(graph.get_top_k(&normalize_word(&query.source), k))
}

#[get("/v1/vertices")]
async fn get_vertices(graph: web::Data<SharedGraph>) -> impl Responder {
	HttpResponse::Ok().json(graph.vertices())
}

#[get("/v1/size")]
async fn get_size(graph: web::Data<SharedGraph>) -> impl Responder {
	HttpResponse::Ok().body(graph.size().to_string())
}

#[get("/v1/report")]
async fn get_report(graph: web::Data<SharedGraph>, query: web::Query<SourceQuery>) -> impl Responder {
	match graph.report(&normalize_word(&query.source)) {
		Some(report) => HttpResponse::Ok().json(report),
		None => HttpResponse::NotFound().body(format!("Unknown source '{}'", query.source)),
	}
}

/// Corpus names, one per line, without their `.txt` extension.
fn corpus_names(files: &[String]) -> String {
	files
		.iter()
		.map(|file| file.strip_suffix(".txt").unwrap_or(file))
		.collect::<Vec<_>>()
		.join("\n")
}

#[get("/v1/corpora")]
async fn get_corpora(config: web::Data<ServerConfig>) -> impl Responder {
	match list_files(&config.data_dir, "txt") {
		Ok(files) => HttpResponse::Ok().body(corpus_names(&files)),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list corpora"),
	}
}

/// HTTP PUT endpoint `/v1/load?names=a,b`
///
/// Ingests the named corpora from the data folder into the shared graph.
/// Each corpus is built on its own before being merged, so queries keep
/// being served while a load is in progress.
#[put("/v1/load")]
async fn put_corpora(
	graph: web::Data<SharedGraph>,
	config: web::Data<ServerConfig>,
	query: web::Query<CorpusQuery>,
) -> impl Responder {
	let query_names = match &query.names {
		Some(s) if !s.trim().is_empty() => s.trim().to_owned(),
		_ => return HttpResponse::BadRequest().body("Missing or empty corpus name"),
	};

	let names: Vec<String> = query_names
		.split(',')
		.map(|s| s.trim())
		.filter(|s| !s.is_empty())
		.map(str::to_owned)
		.collect();

	for name in names {
		if name.contains(['/', '\\']) || name.starts_with('.') {
			return HttpResponse::BadRequest().body(format!("Invalid corpus name '{name}'"));
		}
		let path = config.data_dir.join(format!("{name}.txt"));
		let graph = graph.clone();
		let loaded = web::block(move || graph_from_file(&path).map(|partial| graph.absorb(partial))).await;
		match loaded {
			Ok(Ok(())) => info!("corpus '{name}' loaded"),
			Ok(Err(e)) => {
				warn!("corpus '{name}' failed to load: {e}");
				return HttpResponse::InternalServerError().body(format!("Failed to load corpus '{name}': {e}"));
			}
			Err(e) => return HttpResponse::InternalServerError().body(format!("Loader crashed: {e}")),
		}
	}

	HttpResponse::Ok().body("Corpora loaded successfully")
}

/// Main entry point for the server.
///
/// Starts with an empty shared graph; corpora are added with `PUT /v1/load`.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init();

	let config = ServerConfig::from_env().map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
	info!("serving on {}:{} with corpora from {}", config.host, config.port, config.data_dir.display());

	let shared_graph = web::Data::new(SharedGraph::new());
	let shared_config = web::Data::new(config.clone());

	HttpServer::new(move || {
		App::new()
			.app_data(shared_graph.clone())
			.app_data(shared_config.clone())
			.service(get_generated)
			.service(get_max)
			.service(get_top_k)
			.service(get_vertices)
			.service(get_size)
			.service(get_report)
			.service(get_corpora)
			.service(put_corpora)
	})
		.bind((config.host.as_str(), config.port))?
		.run()
		.await
}

#[cfg(test)]
mod tests {
	use super::*;
	use actix_web::http::StatusCode;
	use actix_web::test;
	use rs_wordgraph_core::MAX_WORDS;

	fn hello_graph() -> web::Data<SharedGraph> {
		let graph = SharedGraph::new();
		graph.add_connection("hello", "world").unwrap();
		for _ in 0..3 {
			graph.add_connection("hello", "its").unwrap();
		}
		graph.add_connection("its", "me").unwrap();
		web::Data::new(graph)
	}

	#[actix_web::test]
	async fn top_k_and_max() {
		let app = test::init_service(
			App::new().app_data(hello_graph()).service(get_top_k).service(get_max),
		)
		.await;

		let req = test::TestRequest::get().uri("/v1/top_k?source=Hello&k=2").to_request();
		let body: Vec<String> = test::call_and_read_body_json(&app, req).await;
		assert_eq!(body, ["its", "world"]);

		let req = test::TestRequest::get().uri("/v1/top_k?source=hello&k=-3").to_request();
		let body: Vec<String> = test::call_and_read_body_json(&app, req).await;
		assert!(body.is_empty());

		let req = test::TestRequest::get().uri("/v1/max?source=hello").to_request();
		assert_eq!(test::call_and_read_body(&app, req).await, "its");

		let req = test::TestRequest::get().uri("/v1/max?source=unknown").to_request();
		assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
	}

	#[actix_web::test]
	async fn generate_validates_parameters() {
		let app = test::init_service(App::new().app_data(hello_graph()).service(get_generated)).await;

		let req = test::TestRequest::get().uri("/v1/generate?seed=hello&count=3&mode=one").to_request();
		assert_eq!(test::call_and_read_body(&app, req).await, "hello its me");

		let req = test::TestRequest::get().uri("/v1/generate?seed=hello&mode=sideways").to_request();
		assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

		let req = test::TestRequest::get().uri("/v1/generate?seed=%21%21").to_request();
		assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
	}

	#[actix_web::test]
	async fn generate_rejects_oversized_counts() {
		let app = test::init_service(App::new().app_data(hello_graph()).service(get_generated)).await;

		let uri = format!("/v1/generate?seed=hello&count={}", usize::MAX);
		let req = test::TestRequest::get().uri(&uri).to_request();
		assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

		let uri = format!("/v1/generate?seed=hello&count={}", MAX_WORDS + 1);
		let req = test::TestRequest::get().uri(&uri).to_request();
		assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
	}

	#[::core::prelude::v1::test]
	fn corpus_names_strip_only_the_extension() {
		let files = ["a.txt".to_owned(), "notes.txt.txt".to_owned(), "my.txt.backup.txt".to_owned()];
		assert_eq!(corpus_names(&files), "a\nnotes.txt\nmy.txt.backup");
		assert_eq!(corpus_names(&[]), "");
	}

	#[actix_web::test]
	async fn vertices_and_size() {
		let app = test::init_service(
			App::new().app_data(hello_graph()).service(get_vertices).service(get_size),
		)
		.await;

		let req = test::TestRequest::get().uri("/v1/vertices").to_request();
		let body: Vec<String> = test::call_and_read_body_json(&app, req).await;
		assert_eq!(body, ["hello", "its"]);

		let req = test::TestRequest::get().uri("/v1/size").to_request();
		assert_eq!(test::call_and_read_body(&app, req).await, "2");
	}
}
