use serde::Serialize;

use crate::errors::WalletError;

/// Connection record of the current session. Never persisted.
///
/// Transitions are pure: each returns a new value and leaves `self` alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WalletSession {
    pub address: Option<String>,
    pub connected: bool,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Disconnected,
    Connecting,
    Connected,
    Errored,
}

impl WalletSession {
    pub fn disconnected() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        match (self.connected, self.loading, self.error.is_some()) {
            (true, _, _) => SessionState::Connected,
            (false, true, _) => SessionState::Connecting,
            (false, false, true) => SessionState::Errored,
            (false, false, false) => SessionState::Disconnected,
        }
    }

    /// Start a connect attempt. Refused while another one is loading.
    pub fn begin_connect(&self) -> Result<Self, WalletError> {
        if self.loading {
            return Err(WalletError::ConnectInProgress);
        }
        Ok(Self {
            address: self.address.clone(),
            connected: false,
            loading: true,
            error: None,
        })
    }

    /// Keep only the first address the wallet reported.
    pub fn connected_with(&self, addresses: &[String]) -> Result<Self, WalletError> {
        let first = addresses.first().ok_or(WalletError::EmptyAddressSet)?;
        Ok(Self {
            address: Some(first.clone()),
            connected: true,
            loading: false,
            error: None,
        })
    }

    pub fn failed(&self, error: &WalletError) -> Self {
        Self {
            address: self.address.clone(),
            connected: false,
            loading: false,
            error: Some(error.to_string()),
        }
    }

    pub fn disconnect(&self) -> Self {
        Self::disconnected()
    }

    /// `connected` implies an address and no error; `loading` implies not
    /// connected.
    pub fn is_consistent(&self) -> bool {
        let connected_ok = !self.connected || (self.address.is_some() && self.error.is_none());
        let loading_ok = !self.loading || !self.connected;
        connected_ok && loading_ok
    }
}
