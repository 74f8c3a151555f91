use anyhow::{Context, Result, anyhow};
use axum::http::HeaderValue;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use platform_authn::AuthConfig;

const MIN_SECRET_BYTES: usize = 32;
/// One year.
const MAX_TOKEN_TTL_MINUTES: i64 = 525_600;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub auth: AuthConfig,
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let secret_b64 = lookup("AUTH_SECRET_BASE64").context("AUTH_SECRET_BASE64 missing")?;
        let secret = STANDARD
            .decode(secret_b64.trim())
            .context("invalid AUTH_SECRET_BASE64")?;
        if secret.len() < MIN_SECRET_BYTES {
            return Err(anyhow!(
                "AUTH_SECRET_BASE64 must decode to at least {MIN_SECRET_BYTES} bytes"
            ));
        }

        let issuer = lookup("AUTH_ISSUER").unwrap_or_else(|| "employee-directory".into());
        let token_ttl_minutes = match lookup("AUTH_TOKEN_TTL_MINUTES") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|minutes| (1..=MAX_TOKEN_TTL_MINUTES).contains(minutes))
                .ok_or_else(|| {
                    anyhow!(
                        "invalid AUTH_TOKEN_TTL_MINUTES {raw}: expected 1..={MAX_TOKEN_TTL_MINUTES}"
                    )
                })?,
            None => 60,
        };

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .filter_map(|s| {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            })
            .collect::<Vec<_>>();
        for origin in &cors_allowed_origins {
            if !origin.is_ascii() || origin.parse::<HeaderValue>().is_err() {
                return Err(anyhow!("invalid origin {origin:?} in CORS_ALLOWED_ORIGINS"));
            }
        }

        Ok(Self {
            auth: AuthConfig {
                secret,
                issuer,
                token_ttl_minutes,
            },
            cors_allowed_origins,
        })
    }
}
