//! Static token sets and lookup by symbol.

pub mod registry;

pub use registry::{Frontend, Token, TokenRegistry};
