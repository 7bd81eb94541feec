//! Bearer token verification against the pool's published keys.
//!
//! `verify` never fails: every error is logged here and turned into `None`.
//! Details stay server-side so a caller probing with forged tokens learns nothing.

use jsonwebtoken::{Algorithm, Validation};
use tracing::{debug, warn};

use crate::services::auth::claims::VerifiedClaims;
use crate::services::auth::jwks::{JwksError, KeyResolver};

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("missing {0}")]
    MissingInput(&'static str),
    #[error("malformed token header: {0}")]
    Malformed(jsonwebtoken::errors::Error),
    #[error("token header has no kid")]
    MissingKid,
    #[error("no signing key available")]
    NoSigningKey,
    #[error(transparent)]
    KeyMaterial(#[from] JwksError),
    #[error("token rejected: {0}")]
    Rejected(jsonwebtoken::errors::Error),
    #[error("token has an empty subject")]
    EmptySubject,
}

impl TokenError {
    // Short, stable name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingInput(_) => "missing_input",
            Self::Malformed(_) => "malformed",
            Self::MissingKid => "missing_kid",
            Self::NoSigningKey => "no_signing_key",
            Self::KeyMaterial(_) => "key_material",
            Self::Rejected(_) => "rejected",
            Self::EmptySubject => "empty_subject",
        }
    }
}

/// RS256 verifier for identity-pool tokens.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    resolver: KeyResolver,
    leeway_seconds: u64,
}

impl TokenVerifier {
    pub fn new(resolver: KeyResolver, leeway_seconds: u64) -> Self {
        Self {
            resolver,
            leeway_seconds,
        }
    }

    /// Verified claims, or `None` for any failure.
    pub async fn verify(
        &self,
        token: &str,
        pool_id: Option<&str>,
        region: Option<&str>,
    ) -> Option<VerifiedClaims> {
        match self.try_verify(token, pool_id, region).await {
            Ok(claims) => Some(claims),
            Err(err @ TokenError::MissingInput(_)) => {
                debug!(error = %err, "token verification skipped");
                None
            }
            Err(err) => {
                warn!(kind = err.kind(), error = %err, "token verification failed");
                None
            }
        }
    }

    /// The verification pipeline; short-circuits at the first failing step.
    pub async fn try_verify(
        &self,
        token: &str,
        pool_id: Option<&str>,
        region: Option<&str>,
    ) -> Result<VerifiedClaims, TokenError> {
        let token = non_empty(Some(token)).ok_or(TokenError::MissingInput("token"))?;
        let pool_id = non_empty(pool_id).ok_or(TokenError::MissingInput("user pool id"))?;
        let region = non_empty(region).ok_or(TokenError::MissingInput("region"))?;

        // Unverified read, only to pick the key.
        let header = jsonwebtoken::decode_header(token).map_err(TokenError::Malformed)?;
        let kid = header
            .kid
            .as_deref()
            .filter(|kid| !kid.is_empty())
            .ok_or(TokenError::MissingKid)?;

        let jwk = self
            .resolver
            .resolve(kid, pool_id, region)
            .await
            .ok_or(TokenError::NoSigningKey)?;
        let decoding_key = jwk.decoding_key()?;

        let issuer = self.resolver.locator().issuer(pool_id, region);
        let validation = self.validation(&issuer);

        let data = jsonwebtoken::decode::<VerifiedClaims>(token, &decoding_key, &validation)
            .map_err(TokenError::Rejected)?;

        // An empty principal means "unauthenticated", so it can never carry an Allow.
        if data.claims.sub.is_empty() {
            return Err(TokenError::EmptySubject);
        }

        Ok(data.claims)
    }

    fn validation(&self, issuer: &str) -> Validation {
        // Only RS256: an HS256 token "signed" with the public key is rejected
        // before any signature check.
        let mut validation = Validation::new(Algorithm::RS256);
        validation.algorithms = vec![Algorithm::RS256];
        validation.set_issuer(&[issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        // Cognito id and access tokens carry different audience claims; not checked.
        validation.validate_aud = false;
        validation.leeway = self.leeway_seconds;
        validation
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
