use serde::Deserialize;
use serde_json::{Map, Value};

/// Claims consulted for the display username, highest priority first.
pub const USERNAME_CLAIMS: [&str; 3] = ["cognito:username", "username", "email"];

/// Payload of a token whose signature, issuer, expiry and subject were checked.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VerifiedClaims {
    pub sub: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VerifiedClaims {
    pub fn claim_str(&self, name: &str) -> Option<&str> {
        self.extra.get(name).and_then(Value::as_str)
    }

    /// First non-empty string claim from [`USERNAME_CLAIMS`].
    pub fn username(&self) -> Option<&str> {
        USERNAME_CLAIMS
            .iter()
            .find_map(|name| self.claim_str(name).filter(|v| !v.is_empty()))
    }
}
