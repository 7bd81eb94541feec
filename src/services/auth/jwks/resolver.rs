//! Key resolution: key-set lookup with an optional read-through cache.
//!
//! Failures never leave this module: the caller only sees "key" or "no key".
//! A rotated key is invisible to a cached set until the set is refetched, so a
//! cached set that lacks the requested kid is refreshed once before falling back.

use std::{sync::Arc, time::Duration};

use tracing::{debug, warn};

use super::{FetchedKeySet, Jwk, JwksError, JwksFetcher, KeySet};
use crate::services::auth::issuer::IssuerLocator;
use crate::services::cache::{CacheClient, CacheError};

const CACHE_PREFIX: &str = "jwks";

#[derive(Clone)]
pub struct KeyResolver {
    fetcher: Arc<dyn JwksFetcher>,
    cache: Option<Arc<dyn CacheClient>>,
    cache_ttl: Duration,
    locator: IssuerLocator,
}

impl std::fmt::Debug for KeyResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyResolver")
            .field("cache", &self.cache.as_ref().map(|c| c.backend_name()))
            .field("cache_ttl", &self.cache_ttl)
            .field("locator", &self.locator)
            .finish()
    }
}

impl KeyResolver {
    pub fn new(fetcher: Arc<dyn JwksFetcher>, locator: IssuerLocator) -> Self {
        Self {
            fetcher,
            cache: None,
            cache_ttl: Duration::ZERO,
            locator,
        }
    }

    /// Caches key sets for at most `ttl` (shortened by the provider's max-age).
    pub fn with_cache(mut self, cache: Arc<dyn CacheClient>, ttl: Duration) -> Self {
        if !ttl.is_zero() {
            self.cache = Some(cache);
            self.cache_ttl = ttl;
        }
        self
    }

    pub fn locator(&self) -> &IssuerLocator {
        &self.locator
    }

    /// Resolves the key named `kid` for the given pool.
    ///
    /// Returns the exact match, else the first key in the set, else `None`
    /// (empty set or the set could not be loaded).
    pub async fn resolve(&self, kid: &str, pool_id: &str, region: &str) -> Option<Jwk> {
        let url = self.locator.jwks_url(pool_id, region);
        let cache_key = format!("{CACHE_PREFIX}:{region}:{pool_id}");

        let key_set = match self.read_cache(&cache_key).await {
            Some(cached) if cached.find(kid).is_some() => cached,
            Some(cached) => {
                debug!(kid, "kid not in cached key set, refreshing");
                match self.fetch_and_store(&url, &cache_key).await {
                    Ok(fresh) => fresh,
                    Err(err) => {
                        warn!(error = %err, url = %url, "jwks refresh failed, using cached set");
                        cached
                    }
                }
            }
            None => match self.fetch_and_store(&url, &cache_key).await {
                Ok(fresh) => fresh,
                Err(err) => {
                    warn!(error = %err, url = %url, "jwks fetch failed");
                    return None;
                }
            },
        };

        if key_set.find(kid).is_none() {
            debug!(kid, keys = key_set.keys.len(), "kid not found, falling back to first key");
        }
        key_set.select(kid).cloned()
    }

    async fn read_cache(&self, cache_key: &str) -> Option<KeySet> {
        let cache = self.cache.as_ref()?;

        let raw = match cache.get_string(cache_key).await {
            Ok(raw) => raw?,
            Err(err) => {
                warn!(error = %err, backend = cache.backend_name(), "jwks cache read failed");
                return None;
            }
        };

        match serde_json::from_str::<KeySet>(&raw) {
            Ok(set) => Some(set),
            Err(err) => {
                warn!(error = %err, "discarding unreadable cached key set");
                None
            }
        }
    }

    async fn fetch_and_store(&self, url: &str, cache_key: &str) -> Result<KeySet, JwksError> {
        let FetchedKeySet { key_set, max_age } = self.fetcher.fetch(url).await?;

        if let Some(cache) = &self.cache {
            let ttl = max_age.map_or(self.cache_ttl, |age| age.min(self.cache_ttl));
            // An empty set is not worth pinning; the next request should retry.
            if !ttl.is_zero() && !key_set.keys.is_empty() {
                let stored = match serde_json::to_string(&key_set) {
                    Ok(raw) => cache.set_with_ttl(cache_key, &raw, ttl).await,
                    Err(err) => Err(CacheError::InvalidValue(err.to_string())),
                };
                if let Err(err) = stored {
                    warn!(error = %err, backend = cache.backend_name(), "jwks cache write failed");
                }
            }
        }

        Ok(key_set)
    }
}
