//! Single-assignment readiness latch fed by the stdout reader.

use bracket_core::line_signals_ready;
use tokio::sync::oneshot;

/// Writer half, owned by the stdout reader.
#[derive(Debug)]
pub struct OutputLatch {
    tx: Option<oneshot::Sender<()>>,
    markers: Vec<String>,
}

/// Reader half, consumed by the readiness race.
#[derive(Debug)]
pub struct OutputMatch {
    rx: oneshot::Receiver<()>,
}

/// Create a latch that fires on the first line containing one of `markers`.
pub fn output_latch(markers: Vec<String>) -> (OutputLatch, OutputMatch) {
    let (tx, rx) = oneshot::channel();
    (
        OutputLatch {
            tx: Some(tx),
            markers,
        },
        OutputMatch { rx },
    )
}

impl OutputLatch {
    /// Offer a stdout line. Returns `true` only for the line that fired the latch.
    pub fn observe(&mut self, line: &str) -> bool {
        if self.tx.is_none() || !line_signals_ready(line, &self.markers) {
            return false;
        }
        if let Some(tx) = self.tx.take() {
            // Receiver gone means readiness already resolved another way
            let _ = tx.send(());
        }
        true
    }

    pub const fn is_fired(&self) -> bool {
        self.tx.is_none()
    }
}

impl OutputMatch {
    /// Resolve when the latch fires.
    ///
    /// Never resolves if the stream closes without a match.
    pub async fn matched(self) {
        if self.rx.await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
