//! Fetch progress reporting.
//!
//! Both source clients emit a [`ProgressEvent`] after every completed page, so
//! a caller can follow a fetch without knowing which provider is running.

use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// A publication provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// The institutional repository (Symplectic Elements).
    Symplectic,
    /// The arXiv preprint feed.
    Arxiv,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Symplectic => f.write_str("symplectic"),
            Self::Arxiv => f.write_str("arxiv"),
        }
    }
}

/// One completed page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Provider that completed the page.
    pub provider: Provider,

    /// Page just completed (1-based).
    pub current: u32,

    /// Total pages reported by the provider.
    pub total: u32,
}

impl ProgressEvent {
    /// Share of the whole fetch this page represents.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 { 1.0 } else { 1.0 / f64::from(self.total) }
    }

    /// Whether this was the last page.
    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.current >= self.total
    }
}

/// Sending half of a progress channel.
///
/// A dropped receiver is not an error: progress is advisory and the fetch
/// carries on without it.
#[derive(Debug, Clone, Default)]
pub struct ProgressReporter {
    tx: Option<mpsc::UnboundedSender<ProgressEvent>>,
}

impl ProgressReporter {
    /// Create a reporter and the receiver its events arrive on.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// A reporter that discards every event.
    #[must_use]
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    /// A reporter whose events are logged at `info` by a background task.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn logging() -> Self {
        let (reporter, mut rx) = Self::channel();
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                tracing::info!(
                    provider = %event.provider,
                    current = event.current,
                    total = event.total,
                    "Progress {:.0}%",
                    f64::from(event.current) * event.fraction() * 100.0
                );
            }
        });
        reporter
    }

    /// Emit an event.
    pub fn report(&self, event: ProgressEvent) {
        tracing::debug!(
            provider = %event.provider,
            current = event.current,
            total = event.total,
            "Page completed"
        );
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }
}
