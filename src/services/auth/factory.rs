/// Factory: build the `Authorizer` from application `Config`.
use std::{sync::Arc, time::Duration};

use crate::config::Config;
use crate::error::AppError;
use crate::services::auth::{
    Authorizer, IssuerLocator, TokenVerifier,
    jwks::{HttpJwksFetcher, KeyResolver},
};
use crate::services::cache::CacheClient;

pub fn build_authorizer(
    config: &Config,
    cache: Option<Arc<dyn CacheClient>>,
) -> Result<Authorizer, AppError> {
    let fetcher = HttpJwksFetcher::new(Duration::from_millis(config.jwks_fetch_timeout_ms))
        .map_err(|err| {
            tracing::error!(error = %err, "failed to build jwks http client");
            AppError::Internal
        })?;

    let locator = IssuerLocator::new(config.idp_base_url.clone());
    let mut resolver = KeyResolver::new(Arc::new(fetcher), locator);
    if let Some(cache) = cache {
        resolver = resolver.with_cache(cache, Duration::from_secs(config.jwks_cache_ttl_seconds));
    }

    Ok(Authorizer::new(
        TokenVerifier::new(resolver, config.token_leeway_seconds),
        config.user_pool_id.clone(),
        config.region.clone(),
        config.token_cookie_name.clone(),
    ))
}
