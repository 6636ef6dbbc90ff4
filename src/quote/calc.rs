use bigdecimal::BigDecimal;
use num_traits::Zero;

use crate::errors::QuoteError;
use crate::models::{QuoteRequest, TradeType};
use crate::tokens::{Token, TokenRegistry};
use crate::utils::{parse_amount, to_fixed};

/// Fraction digits of every rendered quote.
pub const QUOTE_DECIMALS: i64 = 6;

/// Default take of the simulated pool: 30 bps, i.e. a 0.997 multiplier.
pub const DEFAULT_FEE_BPS: u32 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct QuoteComputation {
    pub amount_in: BigDecimal,
    pub amount_out: BigDecimal,
    /// Fee-adjusted units of `token_out` per unit of `token_in`.
    pub execution_price: BigDecimal,
}

impl QuoteComputation {
    /// The side of the trade the user did not type, rendered for display.
    pub fn quoted_text(&self, trade_type: TradeType) -> String {
        match trade_type {
            TradeType::ExactInput => to_fixed(&self.amount_out, QUOTE_DECIMALS),
            TradeType::ExactOutput => to_fixed(&self.amount_in, QUOTE_DECIMALS),
        }
    }
}

/// Multiplier kept by the trader after the fee, e.g. 30 bps -> 0.997.
pub fn fee_factor(fee_bps: u32) -> BigDecimal {
    let kept = 10_000u32.saturating_sub(fee_bps);
    BigDecimal::from(kept) / BigDecimal::from(10_000u32)
}

/// USD value of `amount` units of `token` at its mock price.
pub fn usd_value(amount: &BigDecimal, token: &Token) -> BigDecimal {
    amount * &token.mock_usd_price
}

/// Price both sides of a swap through USD, charging the fee on the output.
///
/// For `ExactInput`, `amount` is what the user pays:
/// `out = amount * price_in / price_out * fee`.
/// For `ExactOutput`, `amount` is what the user wants to receive and the
/// input is solved backwards from the same relation.
pub fn calculate_quote(
    amount: &BigDecimal,
    token_in: &Token,
    token_out: &Token,
    trade_type: TradeType,
    fee_bps: u32,
) -> Result<QuoteComputation, QuoteError> {
    let fee = fee_factor(fee_bps);
    if token_out.mock_usd_price.is_zero() || token_in.mock_usd_price.is_zero() || fee.is_zero() {
        return Err(QuoteError::Fetch(format!(
            "no price for {}/{}",
            token_in.symbol, token_out.symbol
        )));
    }

    let (amount_in, amount_out) = match trade_type {
        TradeType::ExactInput => {
            let raw_out = usd_value(amount, token_in) / &token_out.mock_usd_price;
            (amount.clone(), raw_out * &fee)
        }
        TradeType::ExactOutput => {
            let raw_in = usd_value(amount, token_out) / &token_in.mock_usd_price;
            (raw_in / &fee, amount.clone())
        }
    };

    let execution_price = (&token_in.mock_usd_price / &token_out.mock_usd_price) * &fee;
    Ok(QuoteComputation {
        amount_in,
        amount_out,
        execution_price,
    })
}

/// Resolve a request against the registry and render the quoted amount.
pub fn compute_quote(
    registry: &TokenRegistry,
    request: &QuoteRequest,
    fee_bps: u32,
) -> Result<String, QuoteError> {
    let token_in = registry
        .lookup(&request.token_in)
        .ok_or_else(|| QuoteError::UnknownToken(request.token_in.clone()))?;
    let token_out = registry
        .lookup(&request.token_out)
        .ok_or_else(|| QuoteError::UnknownToken(request.token_out.clone()))?;
    let amount =
        parse_amount(&request.amount).ok_or_else(|| QuoteError::InvalidAmount(request.amount.clone()))?;

    let computation = calculate_quote(&amount, token_in, token_out, request.trade_type, fee_bps)?;
    Ok(computation.quoted_text(request.trade_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn cardano() -> TokenRegistry {
        TokenRegistry::cardano().unwrap()
    }

    fn classic() -> TokenRegistry {
        TokenRegistry::classic().unwrap()
    }

    #[test]
    fn ada_to_usdt_hundred() {
        // 100 * 0.35 = 35 USD -> 35 USDT -> 34.895 after the 0.3% take
        let req = QuoteRequest::exact_input("ADA", "USDT", "100");
        assert_eq!(compute_quote(&cardano(), &req, DEFAULT_FEE_BPS).unwrap(), "34.895000");
    }

    #[test]
    fn usdt_to_ada() {
        let req = QuoteRequest::exact_input("USDT", "ADA", "34.895");
        assert_eq!(compute_quote(&cardano(), &req, DEFAULT_FEE_BPS).unwrap(), "99.400900");
    }

    #[test]
    fn classic_pairs_round_to_six_digits() {
        let registry = classic();
        let cases = [
            ("ETH", "USDC", "1", "2443.148500"),
            ("SOL", "ETH", "10", "0.580990"),
            ("ETH", "SOL", "0.5", "8.554442"),
            ("USDC", "USDC", "1,5", "1.495500"),
        ];
        for (tin, tout, amount, expected) in cases {
            let req = QuoteRequest::exact_input(tin, tout, amount);
            assert_eq!(
                compute_quote(&registry, &req, DEFAULT_FEE_BPS).unwrap(),
                expected,
                "{tin}->{tout} {amount}"
            );
        }
    }

    #[test]
    fn exact_output_inverts_exact_input() {
        let req = QuoteRequest::exact_output("ADA", "USDT", "34.895");
        assert_eq!(compute_quote(&cardano(), &req, DEFAULT_FEE_BPS).unwrap(), "100.000000");
    }

    #[test]
    fn unknown_token_never_yields_amount() {
        let req = QuoteRequest::exact_input("ADA", "BTC", "100");
        assert_eq!(
            compute_quote(&cardano(), &req, DEFAULT_FEE_BPS),
            Err(QuoteError::UnknownToken("BTC".into()))
        );
        let req = QuoteRequest::exact_input("DOGE", "USDT", "100");
        assert!(matches!(
            compute_quote(&cardano(), &req, DEFAULT_FEE_BPS),
            Err(QuoteError::UnknownToken(s)) if s == "DOGE"
        ));
    }

    #[test]
    fn malformed_amount_is_rejected() {
        let req = QuoteRequest::exact_input("ADA", "USDT", "1.2.3");
        assert_eq!(
            compute_quote(&cardano(), &req, DEFAULT_FEE_BPS),
            Err(QuoteError::InvalidAmount("1.2.3".into()))
        );
    }

    #[test]
    fn exponent_amounts_are_invalid() {
        for amount in ["1e3", "1E-2", "1e2000000000"] {
            let req = QuoteRequest::exact_input("ADA", "USDT", amount);
            assert_eq!(
                compute_quote(&cardano(), &req, DEFAULT_FEE_BPS),
                Err(QuoteError::InvalidAmount(amount.into())),
                "{amount}"
            );
        }
    }

    #[test]
    fn fee_factor_from_bps() {
        assert_eq!(fee_factor(30), BigDecimal::from_str("0.997").unwrap());
        assert_eq!(fee_factor(0), BigDecimal::from(1));
        assert!(fee_factor(20_000).is_zero());
    }

    #[test]
    fn execution_price_is_fee_adjusted() {
        let registry = cardano();
        let ada = registry.lookup("ADA").unwrap();
        let usdt = registry.lookup("USDT").unwrap();
        let res = calculate_quote(&BigDecimal::from(1), ada, usdt, TradeType::ExactInput, 30).unwrap();
        assert_eq!(res.execution_price, BigDecimal::from_str("0.34895").unwrap());
        assert_eq!(res.amount_in, BigDecimal::from(1));
    }
}
