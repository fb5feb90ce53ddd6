use std::path::Path;
use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, put, web};

use bigram_gen_core::config::{self, Config, MAX_STEPS_LIMIT};
use bigram_gen_core::io::{get_filename, list_files, read_text};
use bigram_gen_core::model::{BigramModel, DiagnosticEvent, Generator, ModelError};
use log::{debug, error, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// Struct representing query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	seed: Option<String>,
	steps: Option<usize>,
	rng_seed: Option<u64>,
}

#[derive(Deserialize)]
struct ModelQuery {
	name: Option<String>,
}

/// Body of a successful `/v1/generate` call.
#[derive(Serialize)]
struct Generation<'a> {
	tokens: Vec<&'a str>,
	text: String,
	events: Vec<DiagnosticEvent>,
}

struct SharedData {
	model: BigramModel,
	name: String,
}

impl GenerateParams {
	/// Returns the seed token. Whitespace is a valid token, only empty is refused.
	fn seed(&self) -> Result<&str, String> {
		match self.seed.as_deref() {
			Some(s) if !s.is_empty() => Ok(s),
			_ => Err("Missing or empty seed".into()),
		}
	}
}

/// Reads a training file and builds its model.
fn build_model_from_file(path: &Path, chunk_size: usize) -> Result<BigramModel, Box<dyn std::error::Error>> {
	let text = read_text(path)?;
	let model = BigramModel::from_text(&text, chunk_size)?;
	info!("built model from {}: {} predecessor tokens", path.display(), model.len());
	Ok(model)
}

/// Model served at startup: the configured default file, or an empty model.
fn initial_data(config: &Config) -> SharedData {
	let path = config.text_source().default_path();
	match build_model_from_file(&path, config.chunk_size) {
		Ok(model) => SharedData {
			model,
			name: get_filename(&path).unwrap_or_default(),
		},
		Err(e) => {
			warn!("no default model loaded ({e}), use /v1/load_model");
			SharedData { model: BigramModel::default(), name: String::new() }
		}
	}
}

/// HTTP GET endpoint `/v1/generate`
///
/// Generates `steps` tokens after `seed` with the loaded model.
/// `rng_seed` makes the answer reproducible.
#[get("/v1/generate")]
async fn get_generated(
	data: web::Data<Mutex<SharedData>>,
	config: web::Data<Config>,
	query: web::Query<GenerateParams>,
) -> impl Responder {
	let seed = match query.seed() {
		Ok(s) => s,
		Err(e) => return HttpResponse::BadRequest().body(e),
	};
	let steps = query.steps.unwrap_or(config.max_steps);
	if steps > MAX_STEPS_LIMIT {
		return HttpResponse::BadRequest().body(format!("steps must be at most {MAX_STEPS_LIMIT}"));
	}
	let mut rng = match query.rng_seed.or(config.rng_seed) {
		Some(s) => StdRng::seed_from_u64(s),
		None => StdRng::from_os_rng(),
	};

	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	debug!("generate: seed={seed:?} steps={steps} model={}", shared_data.name);
	let generator = Generator::new(&shared_data.model).with_fallback(config.fallback);
	let mut events: Vec<DiagnosticEvent> = Vec::new();
	match generator.generate(seed, steps, &mut rng, &mut events) {
		Ok(tokens) => {
			for event in &events {
				warn!("{event}");
			}
			let text = tokens.join(config.separator.as_str());
			HttpResponse::Ok().json(Generation { tokens, text, events })
		}
		Err(e @ ModelError::EmptyModel) => HttpResponse::Conflict().body(e.to_string()),
		Err(e) => HttpResponse::BadRequest().body(e.to_string()),
	}
}

/// HTTP GET endpoint `/v1/model`: the loaded model as `{ token: { next: probability } }`.
#[get("/v1/model")]
async fn get_model(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	HttpResponse::Ok().json(&shared_data.model)
}

/// HTTP GET endpoint `/v1/models`: training files available in the data directory.
#[get("/v1/models")]
async fn get_models(config: web::Data<Config>) -> impl Responder {
	match list_files(&config.data_dir, "txt") {
		Ok(files) => {
			let names: Vec<String> = files.iter().map(|f| f.trim_end_matches(".txt").to_owned()).collect();
			HttpResponse::Ok().json(names)
		}
		Err(e) => {
			error!("failed to list {}: {e}", config.data_dir.display());
			HttpResponse::InternalServerError().body("Failed to list models")
		}
	}
}

/// HTTP PUT endpoint `/v1/load_model`: rebuilds the model from `<data_dir>/<name>.txt`.
#[put("/v1/load_model")]
async fn put_model(
	data: web::Data<Mutex<SharedData>>,
	config: web::Data<Config>,
	query: web::Query<ModelQuery>,
) -> impl Responder {
	let name = match &query.name {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty model name"),
	};
	if name.contains(['/', '\\']) || name.starts_with('.') {
		return HttpResponse::BadRequest().body("Invalid model name");
	}

	let path = config.data_dir.join(format!("{name}.txt"));
	if !path.is_file() {
		return HttpResponse::NotFound().body(format!("Model {name} not found"));
	}
	let model = match build_model_from_file(&path, config.chunk_size) {
		Ok(m) => m,
		Err(e) => return HttpResponse::InternalServerError().body(format!("Failed to load model: {e}")),
	};

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	shared_data.model = model;
	shared_data.name = name.to_owned();

	HttpResponse::Ok().body("Model loaded successfully")
}

/// Main entry point for the server.
///
/// Builds the default model, wraps it in a `Mutex` so `/v1/load_model` can
/// replace it, and starts an Actix-web HTTP server.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let config = config::from_env().map_err(std::io::Error::other)?;
	config.validate().map_err(std::io::Error::other)?;

	let shared_model = web::Data::new(Mutex::new(initial_data(&config)));
	let shared_config = web::Data::new(config.clone());

	info!("listening on {}:{}", config.host, config.port);
	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.app_data(shared_model.clone())
			.app_data(shared_config.clone())
			.service(get_generated)
			.service(get_model)
			.service(get_models)
			.service(put_model)
	})
		.bind((config.host.as_str(), config.port))?
		.run()
		.await
}
