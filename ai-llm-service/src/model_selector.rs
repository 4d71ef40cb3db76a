//! Pinned model selection.
//!
//! [`ModelSelector`] probes an ordered candidate list once and pins the first
//! model that answers `200` (ready) or `503` (loading). If none does, the
//! configured last-resort model is pinned. The choice lives as long as the
//! selector; there is no re-probing and no expiry.
//!
//! Concurrent callers of [`ModelSelector::resolve`] wait on the same probe
//! sequence, so at most one sequence ever runs per selector.

use std::{
    future::Future,
    pin::Pin,
    sync::atomic::{AtomicUsize, Ordering},
};

use tokio::sync::OnceCell;
use tracing::{info, warn};

/// Result of probing one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Upstream answered 200.
    Ready,
    /// Upstream answered 503; the model exists and is warming up.
    Loading,
    /// Any other status or a transport failure.
    Unavailable(String),
}

impl ProbeOutcome {
    /// Ready and loading candidates are both pinned.
    pub fn pins(&self) -> bool {
        matches!(self, Self::Ready | Self::Loading)
    }
}

/// Something able to send a minimal test prompt to a model.
pub trait ModelProbe: Send + Sync {
    fn probe<'a>(&'a self, model: &'a str)
    -> Pin<Box<dyn Future<Output = ProbeOutcome> + Send + 'a>>;
}

/// Process-lifetime model choice, resolved lazily on first use.
#[derive(Debug)]
pub struct ModelSelector {
    candidates: Vec<String>,
    last_resort: String,
    pinned: OnceCell<String>,
    probe_runs: AtomicUsize,
}

impl ModelSelector {
    pub fn new(candidates: Vec<String>, last_resort: impl Into<String>) -> Self {
        Self {
            candidates,
            last_resort: last_resort.into(),
            pinned: OnceCell::new(),
            probe_runs: AtomicUsize::new(0),
        }
    }

    /// Returns the pinned model, probing candidates on the first call only.
    pub async fn resolve(&self, probe: &dyn ModelProbe) -> String {
        self.pinned
            .get_or_init(|| self.probe_candidates(probe))
            .await
            .clone()
    }

    /// The pinned model, if resolution already happened.
    pub fn pinned(&self) -> Option<&str> {
        self.pinned.get().map(String::as_str)
    }

    /// Number of probe sequences run so far (0 or 1).
    pub fn probe_runs(&self) -> usize {
        self.probe_runs.load(Ordering::Relaxed)
    }

    async fn probe_candidates(&self, probe: &dyn ModelProbe) -> String {
        self.probe_runs.fetch_add(1, Ordering::Relaxed);
        info!(candidates = self.candidates.len(), "probing candidate models");

        for model in &self.candidates {
            match probe.probe(model).await {
                outcome if outcome.pins() => {
                    info!(%model, ?outcome, "model pinned");
                    return model.clone();
                }
                ProbeOutcome::Unavailable(detail) => {
                    warn!(%model, %detail, "candidate model skipped");
                }
                _ => {}
            }
        }

        warn!(model = %self.last_resort, "no candidate answered; pinning last-resort model");
        self.last_resort.clone()
    }
}
