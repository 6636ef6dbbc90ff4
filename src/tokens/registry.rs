use bigdecimal::BigDecimal;
use serde::Serialize;
use std::str::FromStr;
use url::Url;

use crate::errors::{AppError, Result};

/// A swappable asset with a fixed mock USD price.
#[derive(Debug, Clone, Serialize)]
pub struct Token {
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    pub mock_usd_price: BigDecimal,
    /// Display hint for the icon background.
    pub color: String,
    pub icon: Option<Url>,
    /// Native-asset identifiers, only set on chains that have them.
    pub policy_id: Option<String>,
    pub asset_name: Option<String>,
}

/// Which widget variant a registry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Frontend {
    Cardano,
    Classic,
}

impl FromStr for Frontend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "cardano" => Ok(Frontend::Cardano),
            "classic" => Ok(Frontend::Classic),
            other => Err(AppError::Config(format!(
                "unknown frontend {other:?} (expected \"cardano\" or \"classic\")"
            ))),
        }
    }
}

struct TokenDef {
    symbol: &'static str,
    name: &'static str,
    decimals: u8,
    price: &'static str,
    color: &'static str,
    icon: Option<&'static str>,
    policy_id: Option<&'static str>,
    asset_name: Option<&'static str>,
}

const CARDANO_TOKENS: &[TokenDef] = &[
    TokenDef {
        symbol: "ADA",
        name: "Cardano",
        decimals: 6,
        price: "0.35",
        color: "bg-sky-500",
        icon: Some("https://assets.coingecko.com/coins/images/975/large/cardano.png?1547034860"),
        policy_id: None,
        asset_name: None,
    },
    TokenDef {
        symbol: "USDT",
        name: "Tether USD",
        decimals: 6,
        price: "1",
        color: "bg-emerald-500",
        icon: Some("https://assets.coingecko.com/coins/images/325/large/Tether.png?1598529401"),
        policy_id: Some("00000000000000000000000000000000000000000000000000000000"),
        asset_name: Some("555344"),
    },
];

const CLASSIC_TOKENS: &[TokenDef] = &[
    TokenDef {
        symbol: "ETH",
        name: "Ethereum",
        decimals: 18,
        price: "2450.5",
        color: "bg-blue-500",
        icon: None,
        policy_id: None,
        asset_name: None,
    },
    TokenDef {
        symbol: "USDC",
        name: "USD Coin",
        decimals: 6,
        price: "1",
        color: "bg-indigo-500",
        icon: None,
        policy_id: None,
        asset_name: None,
    },
    TokenDef {
        symbol: "SOL",
        name: "Solana",
        decimals: 9,
        price: "142.80",
        color: "bg-purple-500",
        icon: None,
        policy_id: None,
        asset_name: None,
    },
];

/// Immutable list of tokens for one front-end.
#[derive(Debug, Clone)]
pub struct TokenRegistry {
    frontend: Frontend,
    tokens: Vec<Token>,
}

impl TokenRegistry {
    pub fn for_frontend(frontend: Frontend) -> Result<Self> {
        let defs = match frontend {
            Frontend::Cardano => CARDANO_TOKENS,
            Frontend::Classic => CLASSIC_TOKENS,
        };
        let tokens = defs
            .iter()
            .map(TokenDef::build)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { frontend, tokens })
    }

    pub fn cardano() -> Result<Self> {
        Self::for_frontend(Frontend::Cardano)
    }

    pub fn classic() -> Result<Self> {
        Self::for_frontend(Frontend::Classic)
    }

    pub fn frontend(&self) -> Frontend {
        self.frontend
    }

    /// Find a token by exact symbol. `None` means the token is unknown and
    /// must not be quoted.
    pub fn lookup(&self, symbol: &str) -> Option<&Token> {
        self.tokens.iter().find(|t| t.symbol == symbol)
    }

    pub fn symbols(&self) -> Vec<&str> {
        self.tokens.iter().map(|t| t.symbol.as_str()).collect()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}

impl TokenDef {
    fn build(&self) -> Result<Token> {
        Ok(Token {
            symbol: self.symbol.to_string(),
            name: self.name.to_string(),
            decimals: self.decimals,
            mock_usd_price: BigDecimal::from_str(self.price)?,
            color: self.color.to_string(),
            icon: self.icon.map(Url::parse).transpose()?,
            policy_id: self.policy_id.map(str::to_string),
            asset_name: self.asset_name.map(str::to_string),
        })
    }
}
