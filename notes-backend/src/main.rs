use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger, web};
use dotenv::dotenv;
use std::sync::Arc;

mod auth;
mod config;
mod controllers;
mod db;
mod error;
mod models;
mod notes;
mod validation;

use auth::password::HashError;
use auth::{AuthGate, CredentialStore, PasswordHasher, TokenService};
use config::{Config, ConfigError};
use db::{Database, StoreError};
use notes::NoteAccessController;

/// Services shared by every handler.
pub struct AppState {
    pub credentials: CredentialStore,
    pub tokens: TokenService,
    pub notes: NoteAccessController,
}

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("database error: {0}")]
    Store(#[from] StoreError),
    #[error("password hasher error: {0}")]
    Hash(#[from] HashError),
}

/// Wire the stores into the auth and notes services.
fn build_state(
    config: Config,
    db: Arc<Database>,
    hasher: PasswordHasher,
) -> Result<(AppState, AuthGate), StartupError> {
    let tokens = TokenService::new(&config.jwt_secret, config.token_ttl_days)?;
    let credentials = CredentialStore::new(db.clone(), hasher)?;
    let gate = AuthGate::new(tokens.clone(), credentials.clone());
    let notes = NoteAccessController::new(db);

    Ok((
        AppState {
            credentials,
            tokens,
            notes,
        },
        gate,
    ))
}

fn startup() -> Result<(Config, AppState, AuthGate), StartupError> {
    let config = Config::from_env()?;
    log::info!("Loaded configuration: {:?}", config);

    let db = Arc::new(Database::open(&config.database_url, config.db_pool_size)?);
    let (state, gate) = build_state(config.clone(), db, PasswordHasher::default())?;
    Ok((config, state, gate))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let (config, state, gate) = match startup() {
        Ok(parts) => parts,
        Err(e) => {
            log::error!("Failed to start: {}", e);
            std::process::exit(1);
        }
    };

    let state = web::Data::new(state);
    let gate = web::Data::new(gate);
    let frontend_url = config.frontend_url.clone();
    let port = config.port;

    log::info!("Starting server on port {}", port);

    let server = HttpServer::new(move || {
        let cors = match &frontend_url {
            Some(origin) => Cors::default().allowed_origin(origin),
            None => Cors::default().allow_any_origin(),
        }
        .allow_any_method()
        .allow_any_header()
        .max_age(3600);

        App::new()
            .app_data(state.clone())
            .app_data(gate.clone())
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::configure)
            .default_service(web::to(controllers::not_found))
    })
    .bind(("0.0.0.0", port))?
    .run();

    let server_handle = server.handle();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        log::info!("Received Ctrl+C, shutting down...");

        let server_stop = server_handle.stop(true);
        if tokio::time::timeout(std::time::Duration::from_secs(5), server_stop).await.is_err() {
            log::warn!("Timeout waiting for HTTP server to stop, forcing exit...");
        }

        log::info!("Shutdown complete");
    });

    server.await
}
