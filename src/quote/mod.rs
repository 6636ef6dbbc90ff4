//! Mock quoting: fixed price table, flat fee, debounced and delayed like a
//! network call would be.

pub mod calc;
pub mod simulator;

use std::time::Duration;

pub use calc::{
    DEFAULT_FEE_BPS, QUOTE_DECIMALS, QuoteComputation, calculate_quote, compute_quote, fee_factor,
    usd_value,
};
pub use simulator::QuoteSimulator;

/// Timing and fee knobs of the simulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteConfig {
    /// Quiet period a request must survive before it is computed.
    pub debounce: Duration,
    /// Artificial round-trip delay of the computation itself.
    pub latency: Duration,
    pub fee_bps: u32,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            latency: Duration::from_millis(600),
            fee_bps: DEFAULT_FEE_BPS,
        }
    }
}
