//! Core library for the swap-widget project.
//!
//! A headless token-swap widget: a static token registry, a debounced mock
//! quote simulator, a wallet session driven by host-injected providers and a
//! form model that ties them together. Prices and wallets are simulated.

pub mod app;
pub mod config;
pub mod errors;
pub mod form;
pub mod models;
pub mod quote;
pub mod tokens;
pub mod utils;
pub mod wallet;
