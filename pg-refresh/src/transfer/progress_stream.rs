//! Stream wrapper that reports bytes seen to a callback.

use bytes::Bytes;
use futures_util::Stream;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::time::{Duration, Instant};

/// Receives the running byte total
pub type ProgressCallback = Arc<dyn Fn(u64) + Send + Sync>;

const UPDATE_INTERVAL: Duration = Duration::from_millis(250);

/// Wraps a chunk stream, counting bytes and calling back at most every
/// 250ms, plus once when the stream ends.
pub struct ProgressStream<S> {
    inner: S,
    bytes_transferred: u64,
    last_update: Instant,
    callback: ProgressCallback,
}

impl<S, E> ProgressStream<S>
where
    S: Stream<Item = Result<Bytes, E>>,
{
    pub fn new(inner: S, callback: ProgressCallback) -> Self {
        Self {
            inner,
            bytes_transferred: 0,
            last_update: Instant::now(),
            callback,
        }
    }

    pub fn bytes_transferred(&self) -> u64 {
        self.bytes_transferred
    }
}

impl<S, E> Stream for ProgressStream<S>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
{
    type Item = Result<Bytes, E>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match Pin::new(&mut self.inner).poll_next(cx) {
            Poll::Ready(Some(Ok(bytes))) => {
                self.bytes_transferred += bytes.len() as u64;

                let now = Instant::now();
                if now.duration_since(self.last_update) >= UPDATE_INTERVAL {
                    (self.callback)(self.bytes_transferred);
                    self.last_update = now;
                }

                Poll::Ready(Some(Ok(bytes)))
            }
            Poll::Ready(None) => {
                (self.callback)(self.bytes_transferred);
                Poll::Ready(None)
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[tokio::test]
    async fn test_counts_bytes_and_reports_final_total() {
        let seen = Arc::new(AtomicU64::new(0));
        let seen_cb = seen.clone();
        let chunks = futures_util::stream::iter(vec![
            Ok::<_, std::io::Error>(Bytes::from_static(b"abc")),
            Ok(Bytes::from_static(b"defgh")),
        ]);

        let mut stream = ProgressStream::new(
            chunks,
            Arc::new(move |n: u64| seen_cb.store(n, Ordering::SeqCst)),
        );
        while let Some(chunk) = stream.next().await {
            chunk.unwrap();
        }

        assert_eq!(stream.bytes_transferred(), 8);
        assert_eq!(seen.load(Ordering::SeqCst), 8);
    }

    #[tokio::test]
    async fn test_errors_pass_through() {
        let chunks = futures_util::stream::iter(vec![
            Ok(Bytes::from_static(b"abc")),
            Err("connection reset"),
        ]);
        let mut stream = ProgressStream::new(chunks, Arc::new(|_: u64| {}));

        assert!(stream.next().await.unwrap().is_ok());
        assert_eq!(stream.next().await.unwrap().unwrap_err(), "connection reset");
        assert_eq!(stream.bytes_transferred(), 3);
    }
}
