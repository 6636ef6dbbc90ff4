//! Swap form model: selections, amounts, button and status panels.

use bigdecimal::BigDecimal;
use num_traits::Zero;
use serde::Serialize;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use crate::errors::{AppError, QuoteError, Result};
use crate::models::{QuoteRequest, QuoteResult, TradeType};
use crate::quote::{QuoteConfig, QuoteSimulator, calculate_quote, usd_value};
use crate::tokens::{Frontend, TokenRegistry};
use crate::utils::{AMOUNT_INPUT, parse_amount, to_fixed};
use crate::wallet::WalletSession;

/// Slippage presets in basis points (0.1%, 0.5%, 1.0%).
pub const SLIPPAGE_PRESETS_BPS: [u32; 3] = [10, 50, 100];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapButtonState {
    Connect,
    /// A connect is loading; the button is disabled.
    Connecting,
    Insufficient,
    Swap,
}

impl SwapButtonState {
    pub fn label(&self) -> &'static str {
        match self {
            SwapButtonState::Connect => "Connect Wallet",
            SwapButtonState::Connecting => "Connecting...",
            SwapButtonState::Insufficient => "Insufficient Balance",
            SwapButtonState::Swap => "Swap",
        }
    }

    pub fn enabled(&self) -> bool {
        matches!(self, SwapButtonState::Connect | SwapButtonState::Swap)
    }
}

/// Max slippage setting. Displayed only; nothing executes with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlippageSettings {
    bps: u32,
}

impl Default for SlippageSettings {
    fn default() -> Self {
        Self { bps: 50 }
    }
}

impl SlippageSettings {
    pub fn bps(&self) -> u32 {
        self.bps
    }

    /// Accepts one of [`SLIPPAGE_PRESETS_BPS`].
    pub fn select(&mut self, bps: u32) -> bool {
        if !SLIPPAGE_PRESETS_BPS.contains(&bps) {
            return false;
        }
        self.bps = bps;
        true
    }

    pub fn percent(&self) -> String {
        let percent = BigDecimal::from(self.bps) / BigDecimal::from(100u32);
        format!("{}%", to_fixed(&percent, 1))
    }
}

/// Static balances shown next to each token.
#[derive(Debug, Clone, Default)]
pub struct MockBalances {
    balances: HashMap<String, BigDecimal>,
}

impl MockBalances {
    pub fn for_frontend(frontend: Frontend) -> Result<Self> {
        let entries: &[(&str, &str)] = match frontend {
            Frontend::Cardano => &[("ADA", "1500.00"), ("USDT", "250.00")],
            Frontend::Classic => &[("ETH", "1.45"), ("USDC", "2450.00"), ("SOL", "145.20")],
        };
        let mut balances = HashMap::new();
        for (symbol, amount) in entries {
            balances.insert(symbol.to_string(), BigDecimal::from_str(amount)?);
        }
        Ok(Self { balances })
    }

    pub fn set(&mut self, symbol: &str, amount: BigDecimal) {
        self.balances.insert(symbol.to_string(), amount);
    }

    /// Zero for tokens without an entry.
    pub fn of(&self, symbol: &str) -> BigDecimal {
        self.balances.get(symbol).cloned().unwrap_or_else(BigDecimal::zero)
    }
}

/// What the status panels under the inputs show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormStatus {
    pub loading: bool,
    pub error: Option<String>,
    /// `1 IN = r OUT`, present once an amount is typed.
    pub rate: Option<String>,
}

pub struct SwapForm {
    quotes: QuoteSimulator,
    balances: MockBalances,
    slippage: SlippageSettings,
    token_in: String,
    token_out: String,
    pay_amount: String,
    /// Shown until the current request settles (e.g. right after a toggle).
    receive_hint: String,
    generation: u64,
}

impl SwapForm {
    /// Starts on the first two tokens of the registry.
    pub fn new(
        registry: Arc<TokenRegistry>,
        config: QuoteConfig,
        balances: MockBalances,
    ) -> Result<Self> {
        let (token_in, token_out) = match registry.symbols().as_slice() {
            [first, second, ..] => (first.to_string(), second.to_string()),
            _ => {
                return Err(AppError::Config(
                    "a swap form needs at least two tokens".to_string(),
                ));
            }
        };
        Ok(Self {
            quotes: QuoteSimulator::new(registry, config),
            balances,
            slippage: SlippageSettings::default(),
            token_in,
            token_out,
            pay_amount: String::new(),
            receive_hint: String::new(),
            generation: 0,
        })
    }

    pub fn token_in(&self) -> &str {
        &self.token_in
    }

    pub fn token_out(&self) -> &str {
        &self.token_out
    }

    pub fn pay_amount(&self) -> &str {
        &self.pay_amount
    }

    pub fn quotes(&self) -> &QuoteSimulator {
        &self.quotes
    }

    pub fn slippage(&self) -> &SlippageSettings {
        &self.slippage
    }

    pub fn slippage_mut(&mut self) -> &mut SlippageSettings {
        &mut self.slippage
    }

    pub fn balance_of(&self, symbol: &str) -> BigDecimal {
        self.balances.of(symbol)
    }

    /// Current quote result for the derived side.
    pub fn quote(&self) -> QuoteResult {
        self.quotes.current().result
    }

    /// Wait for the latest request issued by this form to settle.
    pub async fn settled(&self) -> QuoteResult {
        self.quotes.settled(self.generation).await.result
    }

    /// The receive field: the settled quote for the current request, or the
    /// last known amount while it is still pending.
    pub fn receive_amount(&self) -> String {
        let snap = self.quotes.current();
        if snap.generation == self.generation && !snap.result.loading {
            snap.result.amount
        } else {
            self.receive_hint.clone()
        }
    }

    /// Type into the pay field. Text that is not a plain decimal is ignored
    /// and `false` is returned.
    pub fn set_pay_amount(&mut self, input: &str) -> bool {
        if !AMOUNT_INPUT.is_match(input) {
            tracing::debug!(input, "[FORM] rejected amount input");
            return false;
        }
        self.pay_amount = input.to_string();
        self.receive_hint = self.receive_amount();
        self.requote();
        true
    }

    /// Fill the pay field with the whole balance of the pay token.
    pub fn max(&mut self) {
        let balance = self.balances.of(&self.token_in);
        let (_, scale) = balance.as_bigint_and_exponent();
        self.pay_amount = to_fixed(&balance, scale.max(0));
        self.receive_hint = self.receive_amount();
        self.requote();
    }

    pub fn select_token_in(&mut self, symbol: &str) -> std::result::Result<(), QuoteError> {
        self.ensure_known(symbol)?;
        if symbol == self.token_out {
            self.toggle_direction();
            return Ok(());
        }
        self.token_in = symbol.to_string();
        self.requote();
        Ok(())
    }

    pub fn select_token_out(&mut self, symbol: &str) -> std::result::Result<(), QuoteError> {
        self.ensure_known(symbol)?;
        if symbol == self.token_in {
            self.toggle_direction();
            return Ok(());
        }
        self.token_out = symbol.to_string();
        self.requote();
        Ok(())
    }

    /// Swap both selections and the last known amounts.
    pub fn toggle_direction(&mut self) {
        let previous_receive = self.receive_amount();
        std::mem::swap(&mut self.token_in, &mut self.token_out);
        self.receive_hint = std::mem::replace(&mut self.pay_amount, previous_receive);
        tracing::debug!(
            token_in = %self.token_in,
            token_out = %self.token_out,
            "[FORM] direction toggled"
        );
        self.requote();
    }

    pub fn button_state(&self, session: &WalletSession) -> SwapButtonState {
        if session.loading {
            return SwapButtonState::Connecting;
        }
        if !session.connected {
            return SwapButtonState::Connect;
        }
        match parse_amount(&self.pay_amount) {
            Some(amount) if !amount.is_zero() && amount <= self.balances.of(&self.token_in) => {
                SwapButtonState::Swap
            }
            _ => SwapButtonState::Insufficient,
        }
    }

    /// Run the mock swap: clears both amounts. Returns `false` when the
    /// button is not in its `Swap` state.
    pub fn submit(&mut self, session: &WalletSession) -> bool {
        if self.button_state(session) != SwapButtonState::Swap {
            return false;
        }
        tracing::info!(
            token_in = %self.token_in,
            token_out = %self.token_out,
            amount = %self.pay_amount,
            slippage_bps = self.slippage.bps(),
            "[FORM] swap submitted"
        );
        self.pay_amount.clear();
        self.receive_hint.clear();
        self.requote();
        true
    }

    /// USD value of the pay amount with 2 fraction digits.
    pub fn pay_usd_value(&self) -> Option<String> {
        let amount = parse_amount(&self.pay_amount)?;
        let token = self.quotes.registry().lookup(&self.token_in)?;
        Some(to_fixed(&usd_value(&amount, token), 2))
    }

    pub fn status(&self) -> FormStatus {
        let quote = self.quote();
        let rate = if self.pay_amount.is_empty() {
            None
        } else {
            self.rate_line()
        };
        FormStatus {
            loading: quote.loading,
            error: quote.error,
            rate,
        }
    }

    fn rate_line(&self) -> Option<String> {
        let registry = self.quotes.registry();
        let token_in = registry.lookup(&self.token_in)?;
        let token_out = registry.lookup(&self.token_out)?;
        let one = BigDecimal::from(1);
        let res = calculate_quote(
            &one,
            token_in,
            token_out,
            TradeType::ExactInput,
            self.quotes.config().fee_bps,
        )
        .ok()?;
        Some(format!(
            "1 {} = {} {}",
            token_in.symbol,
            res.quoted_text(TradeType::ExactInput),
            token_out.symbol
        ))
    }

    fn ensure_known(&self, symbol: &str) -> std::result::Result<(), QuoteError> {
        match self.quotes.registry().lookup(symbol) {
            Some(_) => Ok(()),
            None => Err(QuoteError::UnknownToken(symbol.to_string())),
        }
    }

    fn requote(&mut self) {
        self.generation = self.quotes.request(QuoteRequest::exact_input(
            &self.token_in,
            &self.token_out,
            &self.pay_amount,
        ));
    }
}
