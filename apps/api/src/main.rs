mod auth;
mod config;
mod db;
mod errors;
mod generation;
mod history;
mod image_client;
mod models;
mod routes;
mod state;
mod store;
#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::provider::SupabaseAuth;
use crate::auth::session_file::SessionFile;
use crate::auth::AuthContext;
use crate::config::Config;
use crate::db::create_pool;
use crate::generation::usage_cache::UsageCache;
use crate::image_client::OpenAiImageClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::postgres::PgUsageStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Inkling v{}", env!("CARGO_PKG_VERSION"));

    let db = create_pool(&config.database_url).await?;
    let store = Arc::new(PgUsageStore::new(db));

    let images = Arc::new(OpenAiImageClient::new(config.openai_api_key.clone())?);
    info!("Image client initialized");

    let provider = Arc::new(SupabaseAuth::new(
        &config.supabase_url,
        config.supabase_anon_key.clone(),
    )?);
    let auth = Arc::new(AuthContext::new(
        provider,
        Some(SessionFile::new(config.session_file.clone())),
    ));

    let usage_cache = UsageCache::default();
    usage_cache.clear_on_sign_out(auth.subscribe());

    // Protected routes answer "loading" until this finishes.
    let resolver = Arc::clone(&auth);
    tokio::spawn(async move { resolver.resolve().await });

    let state = AppState {
        auth,
        store,
        images,
        usage_cache,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
