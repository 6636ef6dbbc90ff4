use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

use super::provider::WalletHost;
use super::session::WalletSession;
use crate::errors::WalletError;

/// Owns the wallet session and drives connect/disconnect against the host.
///
/// The session is published on a `watch` channel. Each connect attempt gets
/// an id; `disconnect` and newer attempts invalidate older ids, and an
/// attempt only commits while its id is current.
pub struct WalletContext {
    host: Option<WalletHost>,
    tx: watch::Sender<WalletSession>,
    attempts: AtomicU64,
}

impl WalletContext {
    /// `host` is `None` when no wallet extension is installed.
    pub fn new(host: Option<WalletHost>) -> Self {
        let (tx, _rx) = watch::channel(WalletSession::disconnected());
        Self {
            host,
            tx,
            attempts: AtomicU64::new(0),
        }
    }

    pub fn session(&self) -> WalletSession {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<WalletSession> {
        self.tx.subscribe()
    }

    pub fn available_wallets(&self) -> Vec<String> {
        self.host.as_ref().map(WalletHost::names).unwrap_or_default()
    }

    /// Connect to `wallet_name` (case-insensitive) and return its first
    /// used address.
    ///
    /// Every failure other than [`WalletError::ConnectInProgress`] also
    /// leaves the session errored with the same message. A connect that is
    /// already loading is refused without touching the session.
    pub async fn connect(&self, wallet_name: &str) -> Result<String, WalletError> {
        let mut started = Err(WalletError::ConnectInProgress);
        self.tx.send_if_modified(|session| match session.begin_connect() {
            Ok(next) => {
                started = Ok(self.attempts.fetch_add(1, Ordering::SeqCst) + 1);
                *session = next;
                true
            }
            Err(e) => {
                started = Err(e);
                false
            }
        });
        let attempt = match started {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(wallet = wallet_name, "[WALLET] connect refused: {e}");
                return Err(e);
            }
        };
        tracing::info!(wallet = wallet_name, attempt, "[WALLET] connecting");

        let mut guard = AttemptGuard {
            ctx: self,
            attempt,
            finished: false,
        };
        let probed = self.probe(wallet_name).await;
        guard.finished = true;

        let mut outcome = Err(WalletError::Cancelled);
        let committed = self.tx.send_if_modified(|session| {
            if self.attempts.load(Ordering::SeqCst) != attempt {
                return false;
            }
            match probed.and_then(|addresses| session.connected_with(&addresses)) {
                Ok(next) => {
                    outcome = Ok(next.address.clone().unwrap_or_default());
                    *session = next;
                }
                Err(e) => {
                    *session = session.failed(&e);
                    outcome = Err(e);
                }
            }
            true
        });

        match (&outcome, committed) {
            (Ok(address), _) => tracing::info!(wallet = wallet_name, %address, "[WALLET] connected"),
            (Err(e), true) => {
                tracing::warn!(wallet = wallet_name, kind = ?e.kind(), "[WALLET] connect failed: {e}")
            }
            (Err(_), false) => {
                tracing::info!(wallet = wallet_name, attempt, "[WALLET] connect superseded")
            }
        }
        outcome
    }

    /// Forget the session. Any connect still in flight will not commit.
    pub fn disconnect(&self) {
        self.tx.send_modify(|session| {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            *session = session.disconnect();
        });
        tracing::info!("[WALLET] disconnected");
    }

    async fn probe(&self, wallet_name: &str) -> Result<Vec<String>, WalletError> {
        let host = self.host.as_ref().ok_or(WalletError::ProviderUnavailable)?;
        let provider = host
            .get(wallet_name)
            .ok_or_else(|| WalletError::ProviderNotFound {
                name: wallet_name.to_string(),
                available: host.names(),
            })?;
        let handle = provider.enable().await?;
        handle.used_addresses().await
    }
}

/// Resets a still-loading session if the connect future is dropped early.
struct AttemptGuard<'a> {
    ctx: &'a WalletContext,
    attempt: u64,
    finished: bool,
}

impl Drop for AttemptGuard<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let ctx = self.ctx;
        let attempt = self.attempt;
        ctx.tx.send_if_modified(|session| {
            if ctx.attempts.load(Ordering::SeqCst) != attempt || !session.loading {
                return false;
            }
            *session = session.failed(&WalletError::Cancelled);
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::wallet::provider::StaticWalletProvider;
    use crate::wallet::session::SessionState;
    use std::sync::Arc;
    use std::time::Duration;

    fn host_with(name: &str, provider: StaticWalletProvider) -> Option<WalletHost> {
        Some(WalletHost::new().with(name, Arc::new(provider)))
    }

    #[tokio::test]
    async fn connect_without_host_is_provider_unavailable() {
        let ctx = WalletContext::new(None);
        let err = ctx.connect("nami").await.unwrap_err();
        assert_eq!(err, WalletError::ProviderUnavailable);

        let session = ctx.session();
        assert_eq!(session.state(), SessionState::Errored);
        assert!(!session.connected);
        assert!(!session.loading);
        assert_eq!(
            session.error.as_deref(),
            Some("No wallet provider detected. Please install Nami, Eternl, or Flint.")
        );
    }

    #[tokio::test]
    async fn connect_with_zero_addresses_errors() {
        let ctx = WalletContext::new(host_with("nami", StaticWalletProvider::new(vec![])));
        let err = ctx.connect("nami").await.unwrap_err();
        assert_eq!(err, WalletError::EmptyAddressSet);
        let session = ctx.session();
        assert_eq!(session.state(), SessionState::Errored);
        assert_eq!(session.error.as_deref(), Some("No addresses found in wallet"));
    }

    #[tokio::test]
    async fn connect_success_keeps_first_address() {
        let provider =
            StaticWalletProvider::new(vec!["addr1abc...".to_string(), "addr1zzz".to_string()]);
        let ctx = WalletContext::new(host_with("Nami", provider));

        let address = ctx.connect("NAMI").await.unwrap();
        assert_eq!(address, "addr1abc...");
        assert_eq!(
            ctx.session(),
            WalletSession {
                address: Some("addr1abc...".to_string()),
                connected: true,
                loading: false,
                error: None,
            }
        );
    }

    #[tokio::test]
    async fn unknown_wallet_lists_available_names() {
        let host = WalletHost::new()
            .with("nami", Arc::new(StaticWalletProvider::default()))
            .with("eternl", Arc::new(StaticWalletProvider::default()));
        let ctx = WalletContext::new(Some(host));
        ctx.connect("flint").await.unwrap_err();
        assert_eq!(
            ctx.session().error.as_deref(),
            Some("Wallet \"flint\" not found. Available wallets: eternl, nami")
        );
    }

    #[tokio::test]
    async fn rejected_enable_is_surfaced() {
        let ctx = WalletContext::new(host_with(
            "nami",
            StaticWalletProvider::rejecting("user declined"),
        ));
        let err = ctx.connect("nami").await.unwrap_err();
        assert_eq!(err, WalletError::Provider("user declined".into()));
        assert_eq!(err.kind(), ErrorKind::ConnectFailure);
        assert_eq!(ctx.session().state(), SessionState::Errored);
    }

    #[tokio::test(start_paused = true)]
    async fn reentrant_connect_is_refused() {
        let provider = StaticWalletProvider::new(vec!["addr1abc".to_string()])
            .with_latency(Duration::from_millis(300));
        let ctx = Arc::new(WalletContext::new(host_with("nami", provider)));

        let first = {
            let ctx = Arc::clone(&ctx);
            tokio::spawn(async move { ctx.connect("nami").await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(ctx.session().state(), SessionState::Connecting);

        assert_eq!(
            ctx.connect("nami").await,
            Err(WalletError::ConnectInProgress)
        );
        assert!(ctx.session().loading);

        assert_eq!(first.await.unwrap(), Ok("addr1abc".to_string()));
        assert_eq!(ctx.session().state(), SessionState::Connected);
    }

    #[tokio::test(start_paused = true)]
    async fn disconnect_during_connect_wins() {
        let provider = StaticWalletProvider::new(vec!["addr1abc".to_string()])
            .with_latency(Duration::from_millis(300));
        let ctx = Arc::new(WalletContext::new(host_with("nami", provider)));

        let pending = {
            let ctx = Arc::clone(&ctx);
            tokio::spawn(async move { ctx.connect("nami").await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        ctx.disconnect();

        assert_eq!(pending.await.unwrap(), Err(WalletError::Cancelled));
        assert_eq!(ctx.session(), WalletSession::disconnected());
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_connect_does_not_stay_loading() {
        let provider = StaticWalletProvider::new(vec!["addr1abc".to_string()])
            .with_latency(Duration::from_secs(5));
        let ctx = WalletContext::new(host_with("nami", provider));

        let res = tokio::time::timeout(Duration::from_millis(50), ctx.connect("nami")).await;
        assert!(res.is_err());

        let session = ctx.session();
        assert!(!session.loading);
        assert_eq!(session.error.as_deref(), Some("Wallet connection cancelled"));

        // The same context accepts a new attempt afterwards.
        assert_eq!(ctx.connect("nami").await, Ok("addr1abc".to_string()));
        assert_eq!(ctx.session().state(), SessionState::Connected);
    }

    #[tokio::test]
    async fn disconnect_from_connected() {
        let ctx = WalletContext::new(host_with(
            "nami",
            StaticWalletProvider::new(vec!["addr1abc".to_string()]),
        ));
        ctx.connect("nami").await.unwrap();
        ctx.disconnect();
        assert_eq!(
            ctx.session(),
            WalletSession {
                address: None,
                connected: false,
                loading: false,
                error: None,
            }
        );
    }
}
