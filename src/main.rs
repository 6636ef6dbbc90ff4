use anyhow::Result;
use std::sync::Arc;
use swap_widget::{
    app::{App, ButtonOutcome},
    config::AppConfig,
    utils,
    wallet::{StaticWalletProvider, WalletHost},
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    utils::init_logging();

    let config = AppConfig::load()?;
    let pay_amount = std::env::var("PAY_AMOUNT").unwrap_or_else(|_| "100".into());
    tracing::info!(
        frontend = ?config.frontend,
        debounce_ms = config.quote.debounce.as_millis() as u64,
        latency_ms = config.quote.latency.as_millis() as u64,
        fee_bps = config.quote.fee_bps,
        "[INIT] swap-widget starting"
    );

    // Stand-in for the browser extensions a real host would inject.
    let host = WalletHost::new()
        .with(
            "nami",
            Arc::new(StaticWalletProvider::new(vec![
                "addr1qx2fxv2umyhttkxyxp8x0dlpdt3k6cwng5pxj3jhsydzer3n0d3vllmyqwsx5wktcd8cc3sq835lu7drv2xwl2wywfgs68faae".to_string(),
            ])),
        )
        .with("eternl", Arc::new(StaticWalletProvider::new(vec![])));

    let mut app = App::new(config, Some(host))?;

    match app.press_button().await {
        Ok(ButtonOutcome::Connected(address)) => tracing::info!(%address, "[WALLET] session open"),
        Ok(other) => tracing::info!(?other, "[WALLET] unexpected button outcome"),
        Err(e) => tracing::warn!(kind = ?e.kind(), "[WALLET] {e}"),
    }

    if !app.form_mut().set_pay_amount(&pay_amount) {
        anyhow::bail!("PAY_AMOUNT {pay_amount:?} is not a plain decimal amount");
    }

    // Wait for the debounced quote of the typed amount to settle.
    let quote = app.form().settled().await;
    tracing::debug!(?quote, "[QUOTE] settled");

    let form = app.form();
    let status = form.status();
    tracing::info!(
        pay = %form.pay_amount(),
        token_in = %form.token_in(),
        receive = %form.receive_amount(),
        token_out = %form.token_out(),
        usd = ?form.pay_usd_value(),
        rate = ?status.rate,
        error = ?status.error,
        slippage = %form.slippage().percent(),
        button = app.button_state().label(),
        "[QUOTE] widget state"
    );
    println!("{}", serde_json::to_string_pretty(&app.wallet().session())?);
    println!("{}", serde_json::to_string_pretty(&app.form().quote())?);

    Ok(())
}
