/// Derives issuer and key-set URLs for a user pool.
///
/// Cognito issues tokens with `iss = https://cognito-idp.<region>.amazonaws.com/<pool-id>`
/// and publishes keys under `<iss>/.well-known/jwks.json`. A base override swaps the
/// host part for a local identity provider.
#[derive(Debug, Clone, Default)]
pub struct IssuerLocator {
    base_override: Option<String>,
}

impl IssuerLocator {
    pub fn new(base_override: Option<String>) -> Self {
        Self {
            base_override: base_override.map(|b| b.trim_end_matches('/').to_string()),
        }
    }

    pub fn issuer(&self, pool_id: &str, region: &str) -> String {
        match &self.base_override {
            Some(base) => format!("{base}/{pool_id}"),
            None => format!("https://cognito-idp.{region}.amazonaws.com/{pool_id}"),
        }
    }

    pub fn jwks_url(&self, pool_id: &str, region: &str) -> String {
        format!("{}/.well-known/jwks.json", self.issuer(pool_id, region))
    }
}
