use jsonwebtoken::DecodingKey;
use serde::{Deserialize, Serialize};

use super::JwksError;

/// A published JSON Web Key Set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct KeySet {
    #[serde(default)]
    pub keys: Vec<Jwk>,
}

/// Public signing key as published by the identity provider.
///
/// Only the RSA members are kept; other members are ignored on parse.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Jwk {
    pub kty: String,
    #[serde(default)]
    pub kid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    #[serde(rename = "use", default, skip_serializing_if = "Option::is_none")]
    pub use_: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,
}

impl KeySet {
    pub fn find(&self, kid: &str) -> Option<&Jwk> {
        self.keys.iter().find(|k| k.kid.as_deref() == Some(kid))
    }

    /// Exact kid match, else the first key of the set.
    ///
    /// The fallback key will not verify a token signed by another key; it only
    /// keeps compatibility with providers that omit `kid`.
    pub fn select(&self, kid: &str) -> Option<&Jwk> {
        self.find(kid).or_else(|| self.keys.first())
    }
}

impl Jwk {
    /// Converts the JWK into an RS256 verification key.
    pub fn decoding_key(&self) -> Result<DecodingKey, JwksError> {
        if self.kty != "RSA" {
            return Err(JwksError::UnsupportedKey(format!("kty {}", self.kty)));
        }
        let n = self
            .n
            .as_deref()
            .ok_or_else(|| JwksError::UnsupportedKey("RSA JWK missing n".to_string()))?;
        let e = self
            .e
            .as_deref()
            .ok_or_else(|| JwksError::UnsupportedKey("RSA JWK missing e".to_string()))?;

        DecodingKey::from_rsa_components(n, e)
            .map_err(|e| JwksError::UnsupportedKey(format!("invalid RSA components: {e}")))
    }
}
