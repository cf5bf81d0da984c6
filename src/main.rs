use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{
    http::{header, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

mod auth;
mod config;
mod dashboard;
mod db;
mod display;
mod dto;
mod error;
mod gateway;
mod handlers;
mod models;
mod relay;
mod validation;

#[cfg(test)]
mod tests;

use auth::AuthProvider;
use config::{Config, PersistenceMode};
use gateway::{MemoryGateway, PgGateway, RelayGateway, SharedGateway};
use relay::RelayClient;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub gateway: SharedGateway,
    pub relay: RelayClient,
    pub auth: AuthProvider,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moodlog_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Arc::new(Config::from_env());

    let relay = RelayClient::new(
        &config.relay_base_url,
        Duration::from_secs(config.relay_timeout_secs),
    )
    .context("Failed to build relay client")?;
    let auth = AuthProvider::new(&config).context("Failed to build auth provider client")?;
    let gateway = build_gateway(&config, relay.clone()).await?;

    let state = AppState {
        config: config.clone(),
        gateway,
        relay,
        auth,
    };

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}

/// Store selected by configuration, optionally wrapped by the relay
async fn build_gateway(config: &Config, relay: RelayClient) -> anyhow::Result<SharedGateway> {
    let store: SharedGateway = match &config.database_url {
        Some(url) => {
            let db = db::create_pool(url)
                .await
                .context("Failed to create database pool")?;

            sqlx::migrate!("./migrations")
                .run(&db)
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Database migrations applied");

            Arc::new(PgGateway::new(db))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, records are kept in memory only");
            Arc::new(MemoryGateway::new())
        }
    };

    Ok(match config.persistence_mode {
        PersistenceMode::Direct => store,
        PersistenceMode::Relay => {
            tracing::info!(upstream = %relay.base_url(), "Relaying record writes upstream");
            Arc::new(RelayGateway::new(relay, store))
        }
    })
}

pub fn app(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            "/api/mood",
            get(handlers::mood::describe).post(handlers::mood::submit_mood),
        )
        .route(
            "/api/journal",
            get(handlers::journal::describe).post(handlers::journal::submit_journal),
        )
        .route(
            "/api/external/mood",
            get(handlers::external::describe_mood).post(handlers::external::relay_mood),
        )
        .route(
            "/api/external/journal",
            get(handlers::external::describe_journal).post(handlers::external::relay_journal),
        )
        .route(
            "/api/external/health",
            get(handlers::external::upstream_health),
        )
        .route("/api/auth/signout", post(handlers::auth::sign_out))
        .route(
            "/api/prompts/random",
            get(handlers::reference::random_journal_prompt),
        )
        .route(
            "/api/prompts/:code",
            get(handlers::reference::journal_prompt),
        )
        .route("/api/moods", get(handlers::reference::list_moods));

    let session_routes = Router::new()
        .route(
            "/api/me/mood",
            get(handlers::mood::mood_history).post(handlers::mood::create_my_mood),
        )
        .route("/api/me/mood/latest", get(handlers::mood::latest_mood))
        .route(
            "/api/me/journal",
            get(handlers::journal::list_my_journal).post(handlers::journal::create_my_journal),
        )
        .route("/api/me/dashboard", get(handlers::dashboard::get_dashboard))
        .route(
            "/api/me/settings",
            get(handlers::settings::get_settings).put(handlers::settings::update_settings),
        );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    Router::new()
        .merge(public_routes)
        .merge(session_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::resolve_session,
        ))
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
