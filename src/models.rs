//! Shared data structures used throughout the application.

use serde::Serialize;

/// Which side of the trade the typed amount names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeType {
    #[default]
    ExactInput,
    ExactOutput,
}

/// One keystroke's worth of quote input. Superseded by the next request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub token_in: String,
    pub token_out: String,
    /// Raw user text, e.g. `"100"` or `"1,5"`.
    pub amount: String,
    pub trade_type: TradeType,
}

impl QuoteRequest {
    pub fn exact_input(token_in: &str, token_out: &str, amount: &str) -> Self {
        Self {
            token_in: token_in.to_string(),
            token_out: token_out.to_string(),
            amount: amount.to_string(),
            trade_type: TradeType::ExactInput,
        }
    }

    pub fn exact_output(token_in: &str, token_out: &str, amount: &str) -> Self {
        Self {
            trade_type: TradeType::ExactOutput,
            ..Self::exact_input(token_in, token_out, amount)
        }
    }
}

/// What the widget renders for the derived side of the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QuoteResult {
    /// Decimal text with 6 fraction digits, or empty.
    pub amount: String,
    pub loading: bool,
    pub error: Option<String>,
}

impl QuoteResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_settled(&self) -> bool {
        !self.loading && (!self.amount.is_empty() || self.error.is_some())
    }
}

/// A published result together with the request generation that produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QuoteSnapshot {
    pub generation: u64,
    pub result: QuoteResult,
}
