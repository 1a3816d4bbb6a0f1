use std::env;
use std::path::PathBuf;
use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{get, put, web, App, HttpResponse, HttpServer, Responder};
use log::{info, warn};
use serde::Deserialize;

use evolv_core::error::ChainError;
use evolv_core::io::{list_corpora, read_sequences, resolve_folder};
use evolv_core::model::config::ChainConfig;
use evolv_core::model::markov_chain::MarkovChain;

/// Query parameters of `/v1/feed`
#[derive(Deserialize)]
struct FeedParams {
	tokens: Option<String>,
	update: Option<bool>,
}

/// Query parameters of `/v1/predict`
#[derive(Deserialize)]
struct PredictParams {
	count: Option<usize>,
	update: Option<bool>,
}

#[derive(Deserialize)]
struct MemoryQuery {
	tokens: Option<String>,
}

/// Corpora of `/v1/load_models`; `memory` and `seed` are read as a [`ChainConfig`].
#[derive(Deserialize)]
struct ModelQuery {
	names: Option<String>,
}

/// Largest walk `/v1/predict` accepts in one request.
const MAX_PREDICT_COUNT: usize = 4096;

/// Server settings, read from `EVOLV_*` environment variables.
struct Settings {
	host: String,
	port: u16,
	data: PathBuf,
	chain: ChainConfig,
}

impl Settings {
	fn from_env() -> Result<Self, String> {
		let host = env::var("EVOLV_BIND").unwrap_or_else(|_| "127.0.0.1".to_owned());
		let port = Self::parse_var("EVOLV_PORT")?.unwrap_or(5000);
		let data = resolve_folder(&env::var("EVOLV_DATA").unwrap_or_else(|_| "./data".to_owned()));
		let mut chain = ChainConfig::new(Self::parse_var("EVOLV_MEMORY")?.unwrap_or(0));
		chain.seed = Self::parse_var("EVOLV_SEED")?;
		Ok(Self { host, port, data, chain })
	}

	fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>, String> {
		match env::var(name) {
			Ok(value) => value
				.trim()
				.parse::<T>()
				.map(Some)
				.map_err(|_| format!("{name} has an invalid value: {value}")),
			Err(_) => Ok(None),
		}
	}
}

struct SharedData {
	chain: MarkovChain<String>,
	data: PathBuf,
	loaded: Vec<String>,
}

/// Splits a comma separated list, dropping empty items.
fn split_tokens(raw: &str) -> Vec<String> {
	raw.split(',')
		.map(str::trim)
		.filter(|s| !s.is_empty())
		.map(str::to_owned)
		.collect()
}

/// Maps a chain error onto the matching HTTP status.
fn chain_error_response(e: ChainError) -> HttpResponse {
	match e {
		ChainError::InvalidArgument(_) => HttpResponse::BadRequest().body(e.to_string()),
		ChainError::UninitializedState | ChainError::NoObservedTransitions => {
			HttpResponse::Conflict().body(e.to_string())
		}
		_ => HttpResponse::InternalServerError().body(e.to_string()),
	}
}

/// HTTP PUT endpoint `/v1/feed`
///
/// Learns from a comma separated token sequence.
#[put("/v1/feed")]
async fn put_feed(data: web::Data<Mutex<SharedData>>, query: web::Query<FeedParams>) -> impl Responder {
	let tokens = match &query.tokens {
		Some(s) if !s.trim().is_empty() => split_tokens(s),
		_ => return HttpResponse::BadRequest().body("Missing or empty token list"),
	};

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Chain lock failed"),
	};

	match shared_data.chain.feed_sequence(&tokens, query.update.unwrap_or(true)) {
		Ok(()) => HttpResponse::Ok().body(format!("Learned {} tokens", tokens.len())),
		Err(e) => chain_error_response(e),
	}
}

/// HTTP GET endpoint `/v1/predict`
///
/// Predicts `count` tokens (1 by default). With `update=false` only one
/// token can be drawn, since the chain does not move.
#[get("/v1/predict")]
async fn get_predict(data: web::Data<Mutex<SharedData>>, query: web::Query<PredictParams>) -> impl Responder {
	let count = query.count.unwrap_or(1);
	let update = query.update.unwrap_or(true);
	if count > MAX_PREDICT_COUNT {
		return HttpResponse::BadRequest().body(format!("count must not exceed {MAX_PREDICT_COUNT}"));
	}
	if !update && count > 1 {
		return HttpResponse::BadRequest().body("count > 1 requires update=true");
	}

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Chain lock failed"),
	};

	let result = if update {
		shared_data.chain.generate(count)
	} else {
		shared_data.chain.predict_state(false).map(|token| vec![token])
	};
	match result {
		Ok(tokens) => HttpResponse::Ok().json(tokens),
		Err(e) => chain_error_response(e),
	}
}

#[get("/v1/memory")]
async fn get_memory(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Chain lock failed"),
	};
	match shared_data.chain.memory() {
		Ok(memory) => HttpResponse::Ok().json(memory),
		Err(e) => chain_error_response(e),
	}
}

#[put("/v1/memory")]
async fn put_memory(data: web::Data<Mutex<SharedData>>, query: web::Query<MemoryQuery>) -> impl Responder {
	let tokens = match &query.tokens {
		Some(s) if !s.trim().is_empty() => split_tokens(s),
		_ => return HttpResponse::BadRequest().body("Missing or empty token list"),
	};

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Chain lock failed"),
	};
	shared_data.chain.set_memory(&tokens);
	HttpResponse::Ok().body("Memory set")
}

#[get("/v1/models")]
async fn get_models(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let folder = match data.lock() {
		Ok(m) => m.data.clone(),
		Err(_) => return HttpResponse::InternalServerError().body("Chain lock failed"),
	};
	match list_corpora(&folder, "dat") {
		Ok(names) => HttpResponse::Ok().body(names.join("\n")),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list models"),
	}
}

#[get("/v1/loaded_models")]
async fn get_loaded_models(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Chain lock failed"),
	};
	HttpResponse::Ok().body(shared_data.loaded.join("\n"))
}

/// HTTP PUT endpoint `/v1/load_models`
///
/// Rebuilds the chain from one or more corpora of the data folder. Each
/// line of a corpus is learned as one token sequence.
#[put("/v1/load_models")]
async fn put_model(
	data: web::Data<Mutex<SharedData>>,
	query: web::Query<ModelQuery>,
	config: web::Query<ChainConfig>,
) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Chain lock failed"),
	};

	let model_names = match &query.names {
		Some(s) if !s.trim().is_empty() => split_tokens(s),
		_ => return HttpResponse::BadRequest().body("Missing or empty model name"),
	};

	let config = config.into_inner();
	let mut chain = match MarkovChain::from_config(&config) {
		Ok(chain) => chain,
		Err(e) => return chain_error_response(e),
	};

	for name in &model_names {
		let model_path = shared_data.data.join(format!("{name}.dat"));
		let sequences = match read_sequences(&model_path) {
			Ok(sequences) => sequences,
			Err(e) => {
				warn!("Failed to read {}: {e}", model_path.display());
				return HttpResponse::InternalServerError().body(format!("Failed to load model: {e}"));
			}
		};
		for sequence in sequences {
			if let Err(e) = chain.feed_sequence(sequence, true) {
				return chain_error_response(e);
			}
		}
	}

	info!(
		"Loaded {} with memory {}, {} states",
		model_names.join(", "),
		config.memory,
		chain.state_count()
	);
	shared_data.chain = chain;
	shared_data.loaded = model_names;
	HttpResponse::Ok().body("Models loaded successfully")
}

/// Main entry point for the server.
///
/// Creates an empty chain from the environment settings, wraps it in a
/// `Mutex` (chains are not synchronized internally) and starts an
/// Actix-web HTTP server.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let settings = Settings::from_env().map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
	let chain = MarkovChain::from_config(&settings.chain)
		.map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
	info!(
		"Serving a chain remembering {} states on {}:{}, corpora in {}",
		settings.chain.memory,
		settings.host,
		settings.port,
		settings.data.display()
	);

	let shared_data = SharedData { chain, data: settings.data, loaded: Vec::new() };
	let shared_chain = web::Data::new(Mutex::new(shared_data));

	HttpServer::new(move || {
		App::new()
			.wrap(Logger::default())
			.wrap(Cors::permissive())
			.app_data(shared_chain.clone())
			.service(put_feed)
			.service(get_predict)
			.service(get_memory)
			.service(put_memory)
			.service(get_models)
			.service(put_model)
			.service(get_loaded_models)
	})
		.bind((settings.host, settings.port))?
		.run()
		.await
}
