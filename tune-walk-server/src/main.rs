use actix_cors::Cors;
use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};
use clap::Parser;
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use tune_walk_core::Error;
use tune_walk_core::model::presets::preset_library;
use tune_walk_core::model::section::GraphLibrary;

/// Command-line options of the server.
#[derive(Parser, Debug)]
#[command(name = "tune-walk-server", version, about = "HTTP access to the preset transition graphs")]
struct Cli {
	/// Address to bind
	#[arg(long, default_value = "127.0.0.1")]
	host: String,

	/// Port to bind
	#[arg(long, default_value_t = 5000)]
	port: u16,

	/// Seed used to draw the links of the lyric graph
	#[arg(long)]
	graph_seed: Option<u64>,
}

/// Tokens returned when the query gives no length.
const DEFAULT_LENGTH: usize = 4;

/// Longest walk a single request may ask for.
const MAX_LENGTH: usize = 10_000;

/// Struct representing query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	graph: String,
	length: Option<usize>,
	start: Option<String>,
	seed: Option<u64> // -> entropy if none
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct GenerateResponse {
	graph: String,
	tokens: Vec<String>,
}

/// Read-only after startup: handlers share it without a lock.
struct SharedData {
	library: GraphLibrary<String>
}

/// HTTP GET endpoint `/v1/generate`
///
/// Walks the requested graph and returns the tokens as JSON.
/// Caller errors (unknown graph or start token, zero or oversized
/// length) are 400s.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<SharedData>, query: web::Query<GenerateParams>) -> impl Responder {
	let length = query.length.unwrap_or(DEFAULT_LENGTH);
	if length > MAX_LENGTH {
		return HttpResponse::BadRequest().body(format!("length must be at most {MAX_LENGTH}, got {length}"));
	}
	let mut rng = match query.seed {
		Some(seed) => StdRng::seed_from_u64(seed),
		None => StdRng::from_os_rng(),
	};

	match data.library.generate_section(&query.graph, length, query.start.as_ref(), &mut rng) {
		Ok(sequence) => HttpResponse::Ok().json(GenerateResponse {
			graph: query.graph.clone(),
			tokens: sequence.into_tokens(),
		}),
		Err(e @ (Error::Generate(_) | Error::UnknownSection(_))) => HttpResponse::BadRequest().body(e.to_string()),
		Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
	}
}

#[get("/v1/graphs")]
async fn get_graphs(data: web::Data<SharedData>) -> impl Responder {
	HttpResponse::Ok().body(data.library.keys().collect::<Vec<_>>().join("\n"))
}

fn configure(config: &mut web::ServiceConfig) {
	config.service(get_generated).service(get_graphs);
}

/// Main entry point for the server.
///
/// Builds the preset graph library once and starts an Actix-web HTTP
/// server over it.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init();
	let cli = Cli::parse();

	let mut graph_rng = match cli.graph_seed {
		Some(seed) => StdRng::seed_from_u64(seed),
		None => StdRng::from_os_rng(),
	};
	let library = preset_library(&mut graph_rng)
		.map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
	info!("Loaded graphs: {}", library.keys().collect::<Vec<_>>().join(", "));

	let shared_data = web::Data::new(SharedData { library });

	info!("Listening on {}:{}", cli.host, cli.port);
	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.app_data(shared_data.clone())
			.configure(configure)
	})
		.bind((cli.host.as_str(), cli.port))?
		.run()
		.await
}
