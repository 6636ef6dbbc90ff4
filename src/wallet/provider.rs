//! Host-injected wallet extensions.
//!
//! A host exposes a registry of named providers. Enabling a provider yields a
//! handle that can list the addresses the user has used.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use crate::errors::WalletError;

#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Ask the user to authorize this site. May fail if they refuse.
    async fn enable(&self) -> Result<Box<dyn WalletHandle>, WalletError>;
}

#[async_trait]
pub trait WalletHandle: Send + Sync {
    async fn used_addresses(&self) -> Result<Vec<String>, WalletError>;
}

/// Registry of providers keyed by lowercase wallet name.
#[derive(Clone, Default)]
pub struct WalletHost {
    providers: BTreeMap<String, Arc<dyn WalletProvider>>,
}

impl WalletHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: &str, provider: Arc<dyn WalletProvider>) {
        self.providers.insert(name.to_lowercase(), provider);
    }

    pub fn with(mut self, name: &str, provider: Arc<dyn WalletProvider>) -> Self {
        self.register(name, provider);
        self
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<Arc<dyn WalletProvider>> {
        self.providers.get(&name.to_lowercase()).cloned()
    }

    pub fn names(&self) -> Vec<String> {
        self.providers.keys().cloned().collect()
    }
}

impl std::fmt::Debug for WalletHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletHost")
            .field("providers", &self.names())
            .finish()
    }
}

/// In-memory provider with a fixed address list.
#[derive(Debug, Clone, Default)]
pub struct StaticWalletProvider {
    addresses: Vec<String>,
    rejection: Option<String>,
    latency: Duration,
}

impl StaticWalletProvider {
    pub fn new(addresses: Vec<String>) -> Self {
        Self {
            addresses,
            ..Self::default()
        }
    }

    /// A provider whose `enable` always fails with `reason`.
    pub fn rejecting(reason: &str) -> Self {
        Self {
            rejection: Some(reason.to_string()),
            ..Self::default()
        }
    }

    /// Delay applied to both `enable` and `used_addresses`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

struct StaticWalletHandle {
    addresses: Vec<String>,
    latency: Duration,
}

#[async_trait]
impl WalletProvider for StaticWalletProvider {
    async fn enable(&self) -> Result<Box<dyn WalletHandle>, WalletError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if let Some(reason) = &self.rejection {
            return Err(WalletError::Provider(reason.clone()));
        }
        Ok(Box::new(StaticWalletHandle {
            addresses: self.addresses.clone(),
            latency: self.latency,
        }))
    }
}

#[async_trait]
impl WalletHandle for StaticWalletHandle {
    async fn used_addresses(&self) -> Result<Vec<String>, WalletError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(self.addresses.clone())
    }
}
