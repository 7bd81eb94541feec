/*
 * Responsibility
 * - 環境変数の読み込み (USER_POOL_ID, REGION, JWKS キャッシュ設定など)
 * - 設定値のバリデーション (不正値なら起動失敗)
 * - USER_POOL_ID / REGION の欠落は起動失敗にしない (全リクエスト Deny になる)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_value(value: Option<&str>) -> Self {
        match value
            .unwrap_or("development")
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    // Identity pool the tokens are issued by. Either being absent forces Deny.
    pub user_pool_id: Option<String>,
    pub region: Option<String>,
    // Replaces `https://cognito-idp.<region>.amazonaws.com` (local IdP, tests).
    pub idp_base_url: Option<String>,

    pub token_cookie_name: String,
    pub token_leeway_seconds: u64,

    pub jwks_fetch_timeout_ms: u64,
    pub jwks_cache_ttl_seconds: u64,
    pub valkey_url: Option<String>,

    pub http_timeout_seconds: u64,
    pub http_body_limit_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated the same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port: u16 = parse_or(get("PORT"), "PORT", 3000)?;
        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_value(get("APP_ENV").as_deref());

        let user_pool_id = get("USER_POOL_ID");
        let region = get("REGION").or_else(|| get("AWS_REGION"));

        let idp_base_url = match get("IDP_BASE_URL") {
            Some(raw) => {
                let url = url::Url::parse(&raw).map_err(|_| ConfigError::Invalid("IDP_BASE_URL"))?;
                if !matches!(url.scheme(), "http" | "https") {
                    return Err(ConfigError::Invalid("IDP_BASE_URL"));
                }
                Some(raw.trim_end_matches('/').to_string())
            }
            None => None,
        };

        let token_cookie_name = get("TOKEN_COOKIE_NAME").unwrap_or_else(|| "token".to_string());
        let token_leeway_seconds: u64 = parse_or(get("TOKEN_LEEWAY_SECONDS"), "TOKEN_LEEWAY_SECONDS", 0)?;

        let jwks_fetch_timeout_ms: u64 =
            parse_or(get("JWKS_FETCH_TIMEOUT_MS"), "JWKS_FETCH_TIMEOUT_MS", 3000)?;
        if jwks_fetch_timeout_ms == 0 {
            return Err(ConfigError::Invalid("JWKS_FETCH_TIMEOUT_MS"));
        }
        let jwks_cache_ttl_seconds: u64 =
            parse_or(get("JWKS_CACHE_TTL_SECONDS"), "JWKS_CACHE_TTL_SECONDS", 300)?;

        let valkey_url = get("VALKEY_URL");

        // The request deadline must leave room for a full key-set fetch,
        // otherwise a slow identity provider surfaces as 408 instead of Deny.
        let http_timeout_seconds: u64 =
            parse_or(get("HTTP_TIMEOUT_SECONDS"), "HTTP_TIMEOUT_SECONDS", 15)?;
        if http_timeout_seconds.saturating_mul(1000) <= jwks_fetch_timeout_ms {
            return Err(ConfigError::Invalid("HTTP_TIMEOUT_SECONDS"));
        }
        let http_body_limit_bytes: usize =
            parse_or(get("HTTP_BODY_LIMIT_BYTES"), "HTTP_BODY_LIMIT_BYTES", 64 * 1024)?;
        if http_body_limit_bytes == 0 {
            return Err(ConfigError::Invalid("HTTP_BODY_LIMIT_BYTES"));
        }

        Ok(Self {
            addr,
            app_env,
            user_pool_id,
            region,
            idp_base_url,
            token_cookie_name,
            token_leeway_seconds,
            jwks_fetch_timeout_ms,
            jwks_cache_ttl_seconds,
            valkey_url,
            http_timeout_seconds,
            http_body_limit_bytes,
        })
    }

    pub fn has_identity_pool(&self) -> bool {
        self.user_pool_id.is_some() && self.region.is_some()
    }
}

fn parse_or<T: FromStr>(
    value: Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(raw) => raw.parse::<T>().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}
