/*
 * Responsibility
 * - tracing / panic hook の初期化
 * - Config読み込み → 依存生成 (HTTP client, cache, Authorizer) → Router 組み立て
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc, time::Duration};

use anyhow::Result;
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api,
    config::Config,
    middleware::{self, http::HttpLimits},
    services::{
        auth::build_authorizer,
        cache::{CacheClient, MemoryCacheClient, ValkeyClient},
    },
    state::AppState,
};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,movies_authorizer=debug cargo run
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

        // Development: crash the whole process so we notice immediately.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting authorizer in {:?} mode on {}",
        config.app_env,
        config.addr
    );
    if !config.has_identity_pool() {
        tracing::warn!("USER_POOL_ID or REGION is not set; every request will be denied");
    }

    let state = build_state(&config).await?;
    let app = build_router(state, HttpLimits::from_config(&config));

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let cache = build_cache(config).await?;
    let authorizer = build_authorizer(config, cache)?;

    Ok(AppState::new(Arc::new(authorizer)))
}

async fn build_cache(config: &Config) -> Result<Option<Arc<dyn CacheClient>>> {
    if config.jwks_cache_ttl_seconds == 0 {
        tracing::info!("jwks cache disabled");
        return Ok(None);
    }

    let cache: Arc<dyn CacheClient> = match config.valkey_url.as_deref() {
        Some(url) => Arc::new(ValkeyClient::new(url).await?),
        None => Arc::new(MemoryCacheClient::new()),
    };

    tracing::info!(
        backend = cache.backend_name(),
        ttl = ?Duration::from_secs(config.jwks_cache_ttl_seconds),
        "jwks cache enabled"
    );
    Ok(Some(cache))
}

pub(crate) fn build_router(state: AppState, limits: HttpLimits) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes())
        .with_state(state);

    middleware::http::apply(router, limits)
}
