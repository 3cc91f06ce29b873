//! Async stream line readers (non-UTF8-safe).
//!
//! The backend (and the Python runtime under it) can emit non-UTF8 bytes on
//! stdout/stderr. Using `BufReader::lines()` would terminate the reader task
//! on invalid UTF-8, so lines are read as bytes and decoded lossily.

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::readiness::OutputLatch;

/// Which pipe a reader is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl StreamKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

/// Read `stream` line by line until EOF.
///
/// stdout lines are logged at info and offered to `latch`; stderr lines are
/// logged at warn and never parsed.
pub fn spawn_stream_reader(
    stream: impl AsyncRead + Unpin + Send + 'static,
    kind: StreamKind,
    pid: Option<u32>,
    mut latch: Option<OutputLatch>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let stream_type = kind.as_str();
        let mut reader = BufReader::new(stream);
        let mut buf: Vec<u8> = Vec::with_capacity(1024);

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break, // EOF
                Ok(_) => {
                    // Trim trailing newline(s)
                    if buf.last() == Some(&b'\n') {
                        buf.pop();
                        if buf.last() == Some(&b'\r') {
                            buf.pop();
                        }
                    }

                    let line = String::from_utf8_lossy(&buf);
                    match kind {
                        StreamKind::Stdout => {
                            info!(target: "backend", pid = ?pid, "{}", line);
                            if let Some(latch) = latch.as_mut() {
                                if latch.observe(&line) {
                                    info!(pid = ?pid, "Backend reported startup complete");
                                }
                            }
                        }
                        StreamKind::Stderr => {
                            warn!(target: "backend", pid = ?pid, "{}", line);
                        }
                    }
                }
                Err(e) => {
                    debug!(pid = ?pid, %stream_type, error = %e, "stream reader exiting due to read error");
                    break;
                }
            }
        }

        debug!(pid = ?pid, %stream_type, "stream reader task exiting");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readiness::output_latch;
    use bracket_core::DEFAULT_READY_MARKERS;

    fn markers() -> Vec<String> {
        DEFAULT_READY_MARKERS.iter().map(ToString::to_string).collect()
    }

    #[tokio::test]
    async fn stdout_marker_fires_latch() {
        let (latch, matched) = output_latch(markers());
        let data: &'static [u8] =
            b"INFO:     Started server process [77]\r\nINFO:     Application startup complete.\n";

        spawn_stream_reader(data, StreamKind::Stdout, Some(77), Some(latch))
            .await
            .unwrap();
        matched.matched().await;
    }

    #[tokio::test]
    async fn invalid_utf8_does_not_stop_reader() {
        let (latch, matched) = output_latch(markers());
        let data: &'static [u8] = b"\xff\xfe garbage\nINFO:     Uvicorn running on http://0.0.0.0:8400\n";

        spawn_stream_reader(data, StreamKind::Stdout, None, Some(latch))
            .await
            .unwrap();
        matched.matched().await;
    }

    #[tokio::test]
    async fn stderr_is_never_parsed() {
        let (latch, matched) = output_latch(markers());
        let data: &'static [u8] = b"Uvicorn running\n";

        spawn_stream_reader(data, StreamKind::Stderr, None, Some(latch))
            .await
            .unwrap();
        // The latch was dropped unfired, so the match future never resolves
        let mut pending = tokio_test::task::spawn(matched.matched());
        tokio_test::assert_pending!(pending.poll());
    }
}
