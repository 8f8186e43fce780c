/*
 * Responsibility
 * - Tracing / panic hook setup
 * - Load Config -> build dependencies -> assemble Router
 * - Apply middleware (bearer auth, security headers, CORS, HTTP layers)
 * - Serve with axum::serve() until Ctrl-C
 */
use std::{panic, process};

use anyhow::{Context, Result};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::error::AppError;
use crate::middleware::{self, http::HttpPolicy};
use crate::services::auth::{build_principal_lookup, build_token_codec};
use crate::services::topics::build_topic_store;
use crate::{api, state::AppState};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,foro_hub=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development: crash loudly. Production: keep serving other requests.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env().context("failed to load configuration")?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let db = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    let tokens = build_token_codec(config);
    let principals = build_principal_lookup(db.clone());
    let topics = build_topic_store(db);

    Ok(AppState::new(tokens, principals, topics, config.bearer_scheme))
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let v1 = middleware::auth::apply(api::v1::routes(), state.clone());

    let router = Router::new()
        .nest("/api/v1", v1)
        .fallback(fallback)
        .with_state(state);

    let router = middleware::security_headers::apply(router);
    let router =
        middleware::cors::apply(router, config.app_env, &config.cors_allowed_origins);
    middleware::http::apply(router, HttpPolicy::from_config(config))
}

async fn fallback() -> AppError {
    AppError::not_found("route")
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
