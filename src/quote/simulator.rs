use num_traits::Zero;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::{QuoteConfig, calc::compute_quote};
use crate::models::{QuoteRequest, QuoteResult, QuoteSnapshot};
use crate::tokens::TokenRegistry;
use crate::utils::parse_amount;

/// Turns the latest `QuoteRequest` into a published `QuoteResult`.
///
/// Every call to [`QuoteSimulator::request`] bumps a generation counter and
/// aborts the previous task. A task only publishes while its generation is
/// still the current one, and the check happens under the watch channel's
/// write lock, so a superseded request can never overwrite a newer result.
pub struct QuoteSimulator {
    registry: Arc<TokenRegistry>,
    config: QuoteConfig,
    generation: Arc<AtomicU64>,
    tx: Arc<watch::Sender<QuoteSnapshot>>,
    pending: Option<JoinHandle<()>>,
}

impl QuoteSimulator {
    pub fn new(registry: Arc<TokenRegistry>, config: QuoteConfig) -> Self {
        let (tx, _rx) = watch::channel(QuoteSnapshot::default());
        Self {
            registry,
            config,
            generation: Arc::new(AtomicU64::new(0)),
            tx: Arc::new(tx),
            pending: None,
        }
    }

    pub fn registry(&self) -> &TokenRegistry {
        &self.registry
    }

    pub fn config(&self) -> &QuoteConfig {
        &self.config
    }

    pub fn subscribe(&self) -> watch::Receiver<QuoteSnapshot> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> QuoteSnapshot {
        self.tx.borrow().clone()
    }

    /// Submit a new request, superseding whatever is pending.
    ///
    /// Must be called from within a tokio runtime. Returns the generation
    /// assigned to this request.
    pub fn request(&mut self, request: QuoteRequest) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.abort_pending();

        let is_blank = match parse_amount(&request.amount) {
            Some(amount) => amount.is_zero(),
            None => request.amount.trim().is_empty(),
        };
        if is_blank {
            tracing::debug!(generation, "[QUOTE] empty amount, clearing result");
            self.tx.send_modify(|snap| {
                *snap = QuoteSnapshot {
                    generation,
                    result: QuoteResult::empty(),
                }
            });
            return generation;
        }

        tracing::debug!(
            generation,
            token_in = %request.token_in,
            token_out = %request.token_out,
            amount = %request.amount,
            "[QUOTE] request scheduled"
        );

        let registry = Arc::clone(&self.registry);
        let current = Arc::clone(&self.generation);
        let tx = Arc::clone(&self.tx);
        let config = self.config.clone();

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(config.debounce).await;
            if current.load(Ordering::SeqCst) != generation {
                return;
            }

            let started = tx.send_if_modified(|snap| {
                if current.load(Ordering::SeqCst) != generation {
                    return false;
                }
                snap.generation = generation;
                snap.result.loading = true;
                snap.result.error = None;
                true
            });
            if !started {
                return;
            }

            // Simulated round trip.
            tokio::time::sleep(config.latency).await;

            let outcome = compute_quote(&registry, &request, config.fee_bps);
            let committed = tx.send_if_modified(|snap| {
                if current.load(Ordering::SeqCst) != generation || snap.generation > generation {
                    return false;
                }
                snap.generation = generation;
                snap.result = match &outcome {
                    Ok(amount) => QuoteResult {
                        amount: amount.clone(),
                        loading: false,
                        error: None,
                    },
                    Err(e) => QuoteResult {
                        amount: String::new(),
                        loading: false,
                        error: Some(e.to_string()),
                    },
                };
                true
            });

            match (&outcome, committed) {
                (Ok(amount), true) => {
                    tracing::info!(generation, amount = %amount, "[QUOTE] settled")
                }
                (Err(e), true) => {
                    tracing::warn!(generation, error = %e, kind = ?e.kind(), "[QUOTE] failed")
                }
                (_, false) => tracing::debug!(generation, "[QUOTE] superseded before commit"),
            }
        }));

        generation
    }

    /// Drop the pending request, if any. The visible result stays as is,
    /// except that a loading flag is cleared.
    pub fn cancel(&mut self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.abort_pending();
        self.tx.send_if_modified(|snap| {
            if !snap.result.loading {
                return false;
            }
            snap.generation = generation;
            snap.result.loading = false;
            true
        });
    }

    /// Wait until the request with `generation`, or a newer one, has
    /// published a non-loading result.
    pub async fn settled(&self, generation: u64) -> QuoteSnapshot {
        let mut rx = self.subscribe();
        match rx
            .wait_for(|snap| snap.generation >= generation && !snap.result.loading)
            .await
        {
            Ok(snap) => snap.clone(),
            // The sender lives in `self`, so the channel cannot close here.
            Err(_) => self.current(),
        }
    }

    fn abort_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for QuoteSimulator {
    fn drop(&mut self) {
        self.abort_pending();
    }
}
