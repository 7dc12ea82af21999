use daxli_application::{ParsePolicyError, ZeroParticipantPolicy};
use daxli_presentation::CurrencyFormat;
use std::{env, num::ParseIntError};
use tracing_subscriber::EnvFilter;

const CURRENCY_VAR: &str = "DAXLI_CURRENCY";
const SCALE_VAR: &str = "DAXLI_CURRENCY_SCALE";
const POLICY_VAR: &str = "DAXLI_ZERO_PARTICIPANTS";

/// Largest scale a `rust_decimal::Decimal` can carry.
const MAX_SCALE: u32 = 28;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("DAXLI_CURRENCY_SCALE must be a whole number, got '{value}': {source}")]
    InvalidScale {
        value: String,
        source: ParseIntError,
    },
    #[error("DAXLI_CURRENCY_SCALE must be at most 28, got {0}")]
    ScaleTooLarge(u32),
    #[error("DAXLI_ZERO_PARTICIPANTS: {0}")]
    InvalidPolicy(#[from] ParsePolicyError),
}

/// Runtime settings read from the environment (and `.env`, when present).
#[derive(Debug, PartialEq)]
pub struct AppConfig {
    pub currency: CurrencyFormat,
    pub policy: ZeroParticipantPolicy,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = CurrencyFormat::default();

        let code = lookup(CURRENCY_VAR)
            .map(|code| code.trim().to_owned())
            .filter(|code| !code.is_empty())
            .map_or(defaults.code, Into::into);

        let scale = match lookup(SCALE_VAR) {
            Some(value) => value
                .trim()
                .parse::<u32>()
                .map_err(|source| ConfigError::InvalidScale {
                    value: value.clone(),
                    source,
                })?,
            None => defaults.scale,
        };
        if scale > MAX_SCALE {
            return Err(ConfigError::ScaleTooLarge(scale));
        }

        let policy = match lookup(POLICY_VAR) {
            Some(value) => value.parse()?,
            None => ZeroParticipantPolicy::default(),
        };

        Ok(Self {
            currency: CurrencyFormat::new(code, scale),
            policy,
        })
    }
}

/// Logs go to stderr so the report on stdout stays clean. `RUST_LOG`
/// overrides the default `warn` level.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}
