use std::path::PathBuf;
use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{get, put, web, App, HttpResponse, HttpServer, Responder};
use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::info;
use serde::Deserialize;

use marky_core::config::GenerationConfig;
use marky_core::model::chain::Chain;
use marky_core::model::successors::SuccessorEntry;

/// Serves a word chain over HTTP.
#[derive(Parser, Debug)]
#[command(name = "marky-server", version, about)]
struct Args {
	/// Address to bind
	#[arg(long, default_value = "127.0.0.1")]
	host: String,

	/// Port to bind
	#[arg(long, default_value_t = 5000)]
	port: u16,

	/// Text to learn at start-up, one sentence per line
	#[arg(long)]
	data: Option<PathBuf>,

	/// Seed for reproducible sentences
	#[arg(long)]
	seed: Option<u64>,

	/// Word limit for sentences requested without `max_words`
	#[arg(long, default_value_t = 200)]
	max_words: usize,
}

/// Query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	start: Option<String>, // random starting word if missing or blank
	max_words: Option<usize>,
}

#[derive(Deserialize)]
struct WordQuery {
	word: Option<String>,
}

/// Transitions and totals live in one chain behind one lock, so concurrent
/// requests always see them updated together.
struct SharedData {
	chain: Chain,
	max_words: usize,
}

impl WordQuery {
	fn word(&self) -> Result<&str, String> {
		match &self.word {
			Some(s) if !s.trim().is_empty() => Ok(s.trim()),
			_ => Err("Missing or empty word".into()),
		}
	}
}

/// HTTP GET endpoint `/v1/generate`
///
/// Generates a sentence from `start` (or a random starting word) and returns
/// it as the response body. Sentences are capped by `max_words`, or by the
/// server-wide `--max-words` when the query has none.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<Mutex<SharedData>>, query: web::Query<GenerateParams>) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Chain lock failed"),
	};

	let config = GenerationConfig {
		max_words: query.max_words.or(Some(shared_data.max_words)),
		seed: None,
	};
	if let Err(e) = config.validate() {
		return HttpResponse::BadRequest().body(e.to_string());
	}

	let start = match &query.start {
		Some(s) if !s.trim().is_empty() => s.trim().to_owned(),
		_ => match shared_data.chain.random_starting_word() {
			Some(s) => s,
			None => return HttpResponse::NotFound().body("Nothing learned yet"),
		},
	};

	match shared_data.chain.generate_sentence_with(&start, &config) {
		Ok(sentence) => HttpResponse::Ok().body(sentence),
		Err(e) => HttpResponse::BadRequest().body(e.to_string()),
	}
}

/// HTTP GET endpoint `/v1/next`
///
/// One weighted draw; an empty body means the sentence ends here.
#[get("/v1/next")]
async fn get_next(data: web::Data<Mutex<SharedData>>, query: web::Query<WordQuery>) -> impl Responder {
	let word = match query.word() {
		Ok(w) => w,
		Err(e) => return HttpResponse::BadRequest().body(e),
	};

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Chain lock failed"),
	};
	HttpResponse::Ok().body(shared_data.chain.next_word(word))
}

#[get("/v1/successors")]
async fn get_successors(data: web::Data<Mutex<SharedData>>, query: web::Query<WordQuery>) -> impl Responder {
	let word = match query.word() {
		Ok(w) => w,
		Err(e) => return HttpResponse::BadRequest().body(e),
	};

	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Chain lock failed"),
	};
	let entries: Vec<SuccessorEntry> = shared_data
		.chain
		.successors(word)
		.map(|successors| successors.iter().cloned().collect())
		.unwrap_or_default();
	HttpResponse::Ok().json(entries)
}

/// HTTP PUT endpoint `/v1/sentences`
///
/// Learns every line of the plain-text body, then refreshes probabilities.
#[put("/v1/sentences")]
async fn put_sentences(data: web::Data<Mutex<SharedData>>, body: String) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Chain lock failed"),
	};

	let mut learned = 0;
	for line in body.lines().filter(|line| !line.trim().is_empty()) {
		shared_data.chain.add_sentence(line);
		learned += 1;
	}
	shared_data.chain.update_probabilities();

	HttpResponse::Ok().body(format!("Learned {learned} sentences"))
}

/// Main entry point for the server.
///
/// Optionally learns a corpus, wraps the chain in a `Mutex` for thread
/// safety, and starts an Actix-web HTTP server.
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
	env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
	let args = Args::parse();

	let config = GenerationConfig { max_words: Some(args.max_words), seed: args.seed };
	config.validate()?;

	let random = config.random_source();
	let chain = match &args.data {
		Some(path) => Chain::from_file(path, random)
			.with_context(|| format!("failed to learn from {}", path.display()))?,
		None => Chain::with_random(random),
	};

	let shared_data = web::Data::new(Mutex::new(SharedData { chain, max_words: args.max_words }));

	info!("listening on {}:{}", args.host, args.port);
	HttpServer::new(move || {
		App::new()
			.wrap(Logger::default())
			.wrap(Cors::permissive())
			.app_data(shared_data.clone())
			.service(get_generated)
			.service(get_next)
			.service(get_successors)
			.service(put_sentences)
	})
		.bind((args.host.as_str(), args.port))?
		.run()
		.await?;

	Ok(())
}
