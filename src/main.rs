use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use clap::Parser;
use codementor::ai::Orchestrator;
use codementor::api::middleware::ApiKeyAuth;
use codementor::cli::{
    commands::{Cli, Commands},
    run_cli,
};
use codementor::config::AppConfig;
use codementor::db;
use codementor::llm::ProviderFactory;
use codementor::relay::StreamRelay;
use std::sync::Arc;
use tracing::{error, info};

async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({"status": "healthy"}))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if !matches!(cli.command, Commands::Serve) {
        run_cli(cli.command, cli.config);
        return Ok(());
    }

    info!("Starting CodeMentor server...");

    let config = match AppConfig::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let db_pool = match db::get_connection(&config.database) {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            std::process::exit(1);
        }
    };

    let llm_provider = match ProviderFactory::create_default(&config) {
        Some(p) => p,
        None => {
            error!("Failed to initialize LLM Provider from config.yaml mapping");
            std::process::exit(1);
        }
    };

    // Explicit wiring: one relay and one orchestrator for the whole process,
    // handed to handlers through app data.
    let relay = Arc::new(StreamRelay::new());
    let orchestrator = web::Data::new(Orchestrator::new(
        db_pool.clone(),
        llm_provider.clone(),
        relay.clone(),
    ));

    let host = config.server.host.clone();
    let port = config.server.port;

    info!("Server listening on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(web::Data::new(relay.clone()))
            .app_data(orchestrator.clone())
            .route("/health", web::get().to(health))
            .wrap(ApiKeyAuth)
            .configure(codementor::api::routes::configure)
            .configure(codementor::api::routes_ai::configure)
            .configure(codementor::api::websocket::configure)
    })
    .bind((host, port))?
    .run()
    .await
}
