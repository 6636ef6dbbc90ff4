use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Coarse classification attached to every error, next to its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    ProviderUnavailable,
    ProviderNotFound,
    EmptyAddressSet,
    Busy,
    Cancelled,
    ConnectFailure,
    QuoteFetchFailure,
    Config,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteError {
    #[error("Invalid tokens: unknown symbol {0}")]
    UnknownToken(String),

    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),

    #[error("Failed to fetch quote: {0}")]
    Fetch(String),
}

impl QuoteError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            QuoteError::UnknownToken(_) | QuoteError::InvalidAmount(_) => ErrorKind::Validation,
            QuoteError::Fetch(_) => ErrorKind::QuoteFetchFailure,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    #[error("No wallet provider detected. Please install Nami, Eternl, or Flint.")]
    ProviderUnavailable,

    #[error("Wallet \"{name}\" not found. Available wallets: {}", .available.join(", "))]
    ProviderNotFound { name: String, available: Vec<String> },

    #[error("No addresses found in wallet")]
    EmptyAddressSet,

    #[error("Wallet connection already in progress")]
    ConnectInProgress,

    #[error("Wallet connection cancelled")]
    Cancelled,

    #[error("Failed to connect wallet: {0}")]
    Provider(String),
}

impl WalletError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WalletError::ProviderUnavailable => ErrorKind::ProviderUnavailable,
            WalletError::ProviderNotFound { .. } => ErrorKind::ProviderNotFound,
            WalletError::EmptyAddressSet => ErrorKind::EmptyAddressSet,
            WalletError::ConnectInProgress => ErrorKind::Busy,
            WalletError::Cancelled => ErrorKind::Cancelled,
            WalletError::Provider(_) => ErrorKind::ConnectFailure,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse int error: {0}")]
    ParseInt(#[from] std::num::ParseIntError),

    #[error("Decimal parse error: {0}")]
    ParseDecimal(#[from] bigdecimal::ParseBigDecimalError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error(transparent)]
    Quote(#[from] QuoteError),

    #[error(transparent)]
    Wallet(#[from] WalletError),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Quote(e) => e.kind(),
            AppError::Wallet(e) => e.kind(),
            AppError::Config(_)
            | AppError::ParseInt(_)
            | AppError::ParseDecimal(_)
            | AppError::UrlParse(_) => ErrorKind::Config,
        }
    }
}
