//! Request-time authorization decision.
//!
//! cookie header → token cookie → verified claims → scoped policy.
//! Every path ends in a decision; only a verified token produces Allow.

use std::collections::HashMap;

use base64::Engine as _;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::info;

use crate::services::auth::claims::VerifiedClaims;
use crate::services::auth::cookies::{CookieMap, parse_cookies};
use crate::services::auth::policy::{Effect, PolicyDocument, build_policy};
use crate::services::auth::token::TokenVerifier;

/// Identity the gateway forwards to the backend handlers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecisionContext {
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationDecision {
    pub principal_id: String,
    pub policy_document: PolicyDocument,
    pub context: DecisionContext,
}

impl AuthorizationDecision {
    pub fn allow(resource: &str, claims: &VerifiedClaims) -> Self {
        Self {
            principal_id: claims.sub.clone(),
            policy_document: build_policy(resource, Effect::Allow),
            context: DecisionContext {
                username: claims.username().unwrap_or_default().to_string(),
            },
        }
    }

    pub fn deny(resource: &str) -> Self {
        Self {
            principal_id: String::new(),
            policy_document: build_policy(resource, Effect::Deny),
            context: DecisionContext::default(),
        }
    }

    pub fn effect(&self) -> Effect {
        self.policy_document.effect()
    }
}

/// Where a request stands before verification.
#[derive(Debug, PartialEq, Eq)]
enum TokenLookup<'a> {
    NoCookie,
    CookieNoToken,
    TokenPresent(&'a str),
}

fn lookup_token<'a>(cookies: Option<&'a CookieMap>, cookie_name: &str) -> TokenLookup<'a> {
    match cookies {
        None => TokenLookup::NoCookie,
        Some(cookies) => match cookies.get(cookie_name).map(String::as_str) {
            Some(token) if !token.is_empty() => TokenLookup::TokenPresent(token),
            _ => TokenLookup::CookieNoToken,
        },
    }
}

/// Correlation id for a token; the token itself is never logged.
fn token_fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    let mut encoded = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(digest);
    encoded.truncate(12);
    encoded
}

#[derive(Debug, Clone)]
pub struct Authorizer {
    verifier: TokenVerifier,
    user_pool_id: Option<String>,
    region: Option<String>,
    cookie_name: String,
}

impl Authorizer {
    pub fn new(
        verifier: TokenVerifier,
        user_pool_id: Option<String>,
        region: Option<String>,
        cookie_name: impl Into<String>,
    ) -> Self {
        Self {
            verifier,
            user_pool_id,
            region,
            cookie_name: cookie_name.into(),
        }
    }

    pub async fn authorize(
        &self,
        resource: &str,
        headers: &HashMap<String, String>,
    ) -> AuthorizationDecision {
        let cookies = parse_cookies(headers);
        let lookup = lookup_token(cookies.as_ref(), &self.cookie_name);

        info!(
            resource,
            cookie_present = cookies.is_some(),
            token_present = matches!(lookup, TokenLookup::TokenPresent(_)),
            "authorizer request"
        );

        let token = match lookup {
            TokenLookup::TokenPresent(token) => token,
            TokenLookup::NoCookie | TokenLookup::CookieNoToken => {
                return AuthorizationDecision::deny(resource);
            }
        };

        let decision = match self
            .verifier
            .verify(token, self.user_pool_id.as_deref(), self.region.as_deref())
            .await
        {
            Some(claims) => AuthorizationDecision::allow(resource, &claims),
            None => AuthorizationDecision::deny(resource),
        };

        info!(
            resource,
            effect = %decision.effect(),
            principal = %decision.principal_id,
            token = %token_fingerprint(token),
            "authorizer decision"
        );

        decision
    }
}
