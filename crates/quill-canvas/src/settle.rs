// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Settle barriers: how the export pipeline waits for the host to show the
// normalized view before it rasterizes.

use std::time::Duration;

use quill_bridge::SettleBarrier;
use quill_core::error::{QuillError, Result};
use quill_core::EditorConfig;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Waits a fixed delay regardless of epoch.
#[derive(Debug, Clone, Copy)]
pub struct DelaySettle {
    delay: Duration,
}

impl DelaySettle {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(Duration::from_millis(config.settle_delay_ms))
    }
}

impl Default for DelaySettle {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}

impl SettleBarrier for DelaySettle {
    async fn settle(&self, epoch: u64) -> Result<()> {
        debug!(epoch, delay_ms = self.delay.as_millis() as u64, "Settling by delay");
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

/// Host side of a [`FrameSettle`]: report each epoch once it is on screen.
#[derive(Debug)]
pub struct FrameReporter {
    tx: watch::Sender<u64>,
}

impl FrameReporter {
    /// Record that the frame for `epoch` has been rendered. Older epochs are
    /// ignored.
    pub fn rendered(&self, epoch: u64) {
        self.tx.send_if_modified(|current| {
            if epoch > *current {
                *current = epoch;
                true
            } else {
                false
            }
        });
    }

    pub fn latest(&self) -> u64 {
        *self.tx.borrow()
    }
}

/// Resolves once the host reports a rendered epoch at least as new as the
/// one requested, or fails after a timeout.
#[derive(Debug, Clone)]
pub struct FrameSettle {
    rx: watch::Receiver<u64>,
    timeout: Duration,
}

impl FrameSettle {
    pub fn channel(timeout: Duration) -> (Self, FrameReporter) {
        let (tx, rx) = watch::channel(0);
        (Self { rx, timeout }, FrameReporter { tx })
    }

    pub fn from_config(config: &EditorConfig) -> (Self, FrameReporter) {
        Self::channel(Duration::from_millis(config.settle_timeout_ms))
    }
}

impl SettleBarrier for FrameSettle {
    async fn settle(&self, epoch: u64) -> Result<()> {
        let mut rx = self.rx.clone();
        let rendered = async move { rx.wait_for(|rendered| *rendered >= epoch).await.map(|_| ()) };
        match tokio::time::timeout(self.timeout, rendered).await {
            Ok(Ok(())) => {
                debug!(epoch, "Frame settled");
                Ok(())
            }
            Ok(Err(_)) => {
                warn!(epoch, "Frame reporter dropped before the view settled");
                Err(QuillError::SettleAborted { epoch })
            }
            Err(_) => {
                let waited_ms = self.timeout.as_millis() as u64;
                warn!(epoch, waited_ms, "Timed out waiting for frame");
                Err(QuillError::SettleTimeout { epoch, waited_ms })
            }
        }
    }
}
