//! Composition root: wires the wallet context and the swap form.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::{Result, WalletError};
use crate::form::{MockBalances, SwapButtonState, SwapForm};
use crate::tokens::TokenRegistry;
use crate::wallet::{WalletContext, WalletHost};

/// What pressing the main button did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonOutcome {
    Connected(String),
    Swapped,
    /// The button was disabled.
    Ignored,
}

pub struct App {
    config: AppConfig,
    wallet: Arc<WalletContext>,
    form: SwapForm,
}

impl App {
    /// `host` is the injected wallet registry, `None` when no extension is
    /// installed.
    pub fn new(config: AppConfig, host: Option<WalletHost>) -> Result<Self> {
        let registry = Arc::new(TokenRegistry::for_frontend(config.frontend)?);
        let balances = MockBalances::for_frontend(config.frontend)?;
        let form = SwapForm::new(registry, config.quote.clone(), balances)?;
        tracing::info!(
            frontend = ?config.frontend,
            wallets = ?host.as_ref().map(WalletHost::names),
            "[INIT] swap widget ready"
        );
        Ok(Self {
            config,
            wallet: Arc::new(WalletContext::new(host)),
            form,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn wallet(&self) -> &Arc<WalletContext> {
        &self.wallet
    }

    pub fn form(&self) -> &SwapForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut SwapForm {
        &mut self.form
    }

    pub fn button_state(&self) -> SwapButtonState {
        self.form.button_state(&self.wallet.session())
    }

    /// Connect with the configured wallet when disconnected, otherwise run
    /// the mock swap.
    pub async fn press_button(&mut self) -> std::result::Result<ButtonOutcome, WalletError> {
        match self.button_state() {
            SwapButtonState::Connect => {
                let wallet_name = self.config.default_wallet.clone();
                let address = self.wallet.connect(&wallet_name).await?;
                Ok(ButtonOutcome::Connected(address))
            }
            SwapButtonState::Swap => {
                let session = self.wallet.session();
                if self.form.submit(&session) {
                    Ok(ButtonOutcome::Swapped)
                } else {
                    Ok(ButtonOutcome::Ignored)
                }
            }
            SwapButtonState::Connecting | SwapButtonState::Insufficient => Ok(ButtonOutcome::Ignored),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::Frontend;
    use crate::wallet::StaticWalletProvider;
    use std::time::Duration;

    fn host() -> WalletHost {
        WalletHost::new().with(
            "nami",
            Arc::new(StaticWalletProvider::new(vec!["addr1abc...".to_string()])),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn connect_then_swap() {
        let mut app = App::new(AppConfig::default(), Some(host())).unwrap();
        assert_eq!(app.button_state(), SwapButtonState::Connect);

        let outcome = app.press_button().await.unwrap();
        assert_eq!(outcome, ButtonOutcome::Connected("addr1abc...".to_string()));
        assert_eq!(app.button_state(), SwapButtonState::Insufficient);
        assert_eq!(app.press_button().await.unwrap(), ButtonOutcome::Ignored);

        app.form_mut().set_pay_amount("100");
        tokio::time::sleep(Duration::from_millis(1200)).await;
        assert_eq!(app.form().receive_amount(), "34.895000");
        assert_eq!(app.button_state(), SwapButtonState::Swap);

        assert_eq!(app.press_button().await.unwrap(), ButtonOutcome::Swapped);
        assert_eq!(app.form().pay_amount(), "");
    }

    #[tokio::test]
    async fn missing_host_surfaces_error_state() {
        let mut app = App::new(AppConfig::default(), None).unwrap();
        let err = app.press_button().await.unwrap_err();
        assert_eq!(err, WalletError::ProviderUnavailable);
        assert_eq!(app.button_state(), SwapButtonState::Connect);
        assert!(app.wallet().session().error.is_some());
    }

    #[tokio::test]
    async fn classic_frontend_uses_its_own_tokens() {
        let config = AppConfig {
            frontend: Frontend::Classic,
            ..AppConfig::default()
        };
        let app = App::new(config, Some(host())).unwrap();
        assert_eq!((app.form().token_in(), app.form().token_out()), ("ETH", "USDC"));
    }
}
