//! Server configuration, read once from the environment at startup.

use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use eyre::WrapErr;

use advisora_billing::client::{DEFAULT_API_BASE, StripeConfig};
use advisora_llm::client::{DEFAULT_BASE_URL, DEFAULT_MODEL, LlmConfig};

use crate::middleware::rate_limit::RateLimitConfig;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DOWNLOAD_DIR: &str = "static/downloads";
pub const DEFAULT_RETENTION_HOURS: u64 = 24;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    pub llm: LlmConfig,
    pub stripe: StripeConfig,
    /// Skip checkout and let `/generate-report` generate directly.
    pub bypass_payment: bool,
    pub download_dir: PathBuf,
    /// Directory searched for report fonts before the system font dirs.
    pub font_dir: Option<PathBuf>,
    pub document_retention: Duration,
    pub rate_limit: RateLimitConfig,
    /// Externally visible base URL for Stripe redirects. Derived from the
    /// `Host` header when unset.
    pub public_url: Option<String>,
}

impl ServerConfig {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let llm = LlmConfig {
            api_key: get("OPENAI_API_KEY"),
            base_url: get("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            ..LlmConfig::default()
        };

        let stripe_defaults = StripeConfig::default();
        let stripe = StripeConfig {
            secret_key: get("STRIPE_SECRET_KEY"),
            publishable_key: get("STRIPE_PUBLISHABLE_KEY"),
            api_base: get("STRIPE_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            price_cents: parse_or(&get, "PRICE_CENTS", stripe_defaults.price_cents)?,
            currency: stripe_defaults.currency,
        };

        let rate_defaults = RateLimitConfig::default();
        let retention_hours: u64 = parse_or(&get, "DOCUMENT_RETENTION_HOURS", DEFAULT_RETENTION_HOURS)?;

        Ok(Self {
            bind_addr: parse_or(&get, "BIND_ADDR", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?,
            port: parse_or(&get, "PORT", DEFAULT_PORT)?,
            llm,
            stripe,
            bypass_payment: get("BYPASS_PAYMENT").is_some_and(|v| v.eq_ignore_ascii_case("true")),
            download_dir: get("DOWNLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DOWNLOAD_DIR)),
            font_dir: get("FONT_DIR").map(PathBuf::from),
            document_retention: Duration::from_secs(retention_hours * 3600),
            rate_limit: RateLimitConfig {
                per_hour: parse_or(&get, "RATE_LIMIT_PER_HOUR", rate_defaults.per_hour)?,
                per_day: parse_or(&get, "RATE_LIMIT_PER_DAY", rate_defaults.per_day)?,
                trust_forwarded_for: get("TRUST_FORWARDED_FOR").is_some_and(|v| v.eq_ignore_ascii_case("true")),
            },
            public_url: get("PUBLIC_URL").map(|url| url.trim_end_matches('/').to_string()),
        })
    }

    /// Log the effective configuration. Secrets only appear as hints.
    pub fn log_summary(&self) {
        match &self.llm.api_key {
            Some(key) => tracing::info!(key = %redact_secret(key), model = %self.llm.model, "generative API configured"),
            None => tracing::warn!("OPENAI_API_KEY is not set; report generation will fail"),
        }
        match &self.stripe.secret_key {
            Some(key) => tracing::info!(key = %redact_secret(key), "Stripe configured"),
            None => tracing::warn!("STRIPE_SECRET_KEY is not set; checkout will fail"),
        }
        if self.stripe.publishable_key.is_none() {
            tracing::warn!("STRIPE_PUBLISHABLE_KEY is not set; the order page cannot start checkout");
        }
        if self.bypass_payment {
            tracing::warn!("BYPASS_PAYMENT is enabled; reports are generated without payment");
        }
        tracing::info!(
            download_dir = %self.download_dir.display(),
            font_dir = ?self.font_dir,
            trust_forwarded_for = self.rate_limit.trust_forwarded_for,
            retention_hours = self.document_retention.as_secs() / 3600,
            per_hour = self.rate_limit.per_hour,
            per_day = self.rate_limit.per_day,
            "server configuration loaded"
        );
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> eyre::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw.parse().wrap_err_with(|| format!("invalid value for {key}: {raw:?}")),
        None => Ok(default),
    }
}

/// First and last four characters of a secret, e.g. `sk_t...9xQa`.
pub fn redact_secret(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let prefix: String = chars[..4].iter().collect();
    let suffix: String = chars[chars.len() - 4..].iter().collect();
    format!("{prefix}...{suffix}")
}
