//! Wallet session: connect/disconnect against host-injected providers.

pub mod context;
pub mod provider;
pub mod session;

pub use context::WalletContext;
pub use provider::{StaticWalletProvider, WalletHandle, WalletHost, WalletProvider};
pub use session::{SessionState, WalletSession};
