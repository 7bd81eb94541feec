//! Identity-provider key sets: fetching, caching and kid selection.

pub mod fetcher;
pub mod resolver;
pub mod types;

pub use fetcher::{FetchedKeySet, HttpJwksFetcher, JwksFetcher};
pub use resolver::KeyResolver;
pub use types::{Jwk, KeySet};

#[derive(Debug, thiserror::Error)]
pub enum JwksError {
    #[error("jwks request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("jwks endpoint returned {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed jwks document: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unsupported jwk: {0}")]
    UnsupportedKey(String),
}
