use std::time::Duration;

use async_trait::async_trait;
use reqwest::header;

use super::{JwksError, KeySet};

/// A key set together with the freshness the provider advertised.
#[derive(Debug, Clone)]
pub struct FetchedKeySet {
    pub key_set: KeySet,
    // `Cache-Control: max-age`, when present.
    pub max_age: Option<Duration>,
}

/// Source of key-set documents.
///
/// One fetch per call; retries are the caller's business (there are none).
#[async_trait]
pub trait JwksFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedKeySet, JwksError>;
}

/// Fetches key sets over HTTPS.
///
/// Holds one `reqwest::Client` for the whole process; the connection pool is
/// reused across requests.
#[derive(Debug, Clone)]
pub struct HttpJwksFetcher {
    client: reqwest::Client,
}

impl HttpJwksFetcher {
    pub fn new(timeout: Duration) -> Result<Self, JwksError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl JwksFetcher for HttpJwksFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedKeySet, JwksError> {
        let resp = self.client.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(JwksError::Status(resp.status()));
        }

        let max_age = resp
            .headers()
            .get(header::CACHE_CONTROL)
            .and_then(|h| h.to_str().ok())
            .and_then(parse_cache_control_max_age)
            .map(Duration::from_secs);

        let body = resp.text().await?;
        let key_set: KeySet = serde_json::from_str(&body)?;

        Ok(FetchedKeySet { key_set, max_age })
    }
}

fn parse_cache_control_max_age(cc: &str) -> Option<u64> {
    cc.split(',')
        .filter_map(|part| part.trim().strip_prefix("max-age="))
        .find_map(|rest| rest.trim().parse::<u64>().ok())
}
