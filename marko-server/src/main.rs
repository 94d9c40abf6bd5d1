use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use clap::Parser;
use env_logger::Env;
use log::info;

use marko_server::api;

/// Origins allowed when none is given on the command line.
const DEFAULT_ORIGINS: &[&str] = &["http://localhost:3000"];

#[derive(Parser)]
#[command(name = "marko-server", about = "Markov sentence generation server")]
struct Cli {
	/// Address to bind
	#[arg(long, default_value = "127.0.0.1")]
	host: String,

	/// Port to listen on
	#[arg(long, default_value = "5000")]
	port: u16,

	/// Origin allowed by CORS (repeatable)
	#[arg(long = "allowed-origin")]
	allowed_origins: Vec<String>,

	/// Largest accepted corpus, in bytes
	#[arg(long, default_value = "1048576")]
	max_body_bytes: usize,

	/// Worker threads (defaults to the number of CPUs)
	#[arg(long)]
	workers: Option<usize>,
}

/// Main entry point for the server.
///
/// Parses the command line, installs the logger and starts an Actix-web HTTP
/// server. Nothing is shared between requests besides the configuration.
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
	env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

	let cli = Cli::parse();
	let origins: Vec<String> = if cli.allowed_origins.is_empty() {
		DEFAULT_ORIGINS.iter().map(|o| (*o).to_owned()).collect()
	} else {
		cli.allowed_origins.clone()
	};
	let workers = cli.workers.unwrap_or_else(num_cpus::get);
	let max_body_bytes = cli.max_body_bytes;

	info!("Allowed origins: {}", origins.join(", "));
	info!("Serving on {}:{} with {workers} workers", cli.host, cli.port);

	HttpServer::new(move || {
		let cors = origins
			.iter()
			.fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
			.allow_any_method()
			.allow_any_header()
			.supports_credentials();

		App::new()
			.wrap(cors)
			.wrap(middleware::Logger::default())
			.app_data(web::PayloadConfig::new(max_body_bytes))
			.configure(api::configure)
	})
		.workers(workers)
		.bind((cli.host.as_str(), cli.port))?
		.run()
		.await?;

	Ok(())
}
