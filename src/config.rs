//! Configuration loader and application settings.

use std::time::Duration;

use crate::errors::{AppError, Result};
use crate::quote::QuoteConfig;
use crate::tokens::Frontend;

/// Consolidated application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Which token set and balances the widget shows.
    pub frontend: Frontend,
    pub quote: QuoteConfig,
    /// Wallet the demo binary connects to.
    pub default_wallet: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            frontend: Frontend::Cardano,
            quote: QuoteConfig::default(),
            default_wallet: "nami".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables, falling back to the
    /// defaults for anything unset.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::load`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let frontend = match lookup("SWAP_FRONTEND") {
            Some(raw) => raw.parse()?,
            None => defaults.frontend,
        };
        let debounce = millis(&lookup, "QUOTE_DEBOUNCE_MS", defaults.quote.debounce)?;
        let latency = millis(&lookup, "QUOTE_LATENCY_MS", defaults.quote.latency)?;
        let fee_bps = match lookup("QUOTE_FEE_BPS") {
            Some(raw) => raw.trim().parse::<u32>()?,
            None => defaults.quote.fee_bps,
        };
        if fee_bps >= 10_000 {
            return Err(AppError::Config(format!(
                "QUOTE_FEE_BPS must be below 10000, got {fee_bps}"
            )));
        }
        let default_wallet = lookup("DEFAULT_WALLET")
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty())
            .unwrap_or(defaults.default_wallet);

        Ok(Self {
            frontend,
            quote: QuoteConfig {
                debounce,
                latency,
                fee_bps,
            },
            default_wallet,
        })
    }
}

fn millis<F>(lookup: &F, key: &str, default: Duration) -> Result<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => Ok(Duration::from_millis(raw.trim().parse()?)),
        None => Ok(default),
    }
}
