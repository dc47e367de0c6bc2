//! Input shaping for typed queries.

use futures::{stream, Stream, StreamExt};
use std::pin::Pin;
use std::time::Duration;

struct Debounce<S: Stream> {
    inner: Pin<Box<S>>,
    pending: Option<S::Item>,
    ended: bool,
}

/// Yield an item only once `period` has passed without a newer one.
///
/// Each new item restarts the quiet period and replaces the held item. When
/// the input ends, the held item (if any) is flushed immediately.
pub fn debounce<S>(input: S, period: Duration) -> impl Stream<Item = S::Item> + Send
where
    S: Stream + Send + 'static,
    S::Item: Send,
{
    let state = Debounce {
        inner: Box::pin(input),
        pending: None,
        ended: false,
    };

    stream::unfold(state, move |mut st| async move {
        if st.ended {
            return None;
        }

        loop {
            match st.pending.take() {
                None => match st.inner.next().await {
                    Some(item) => st.pending = Some(item),
                    None => return None,
                },
                Some(held) => match tokio::time::timeout(period, st.inner.next()).await {
                    Err(_quiet) => return Some((held, st)),
                    Ok(Some(newer)) => st.pending = Some(newer),
                    Ok(None) => {
                        st.ended = true;
                        return Some((held, st));
                    }
                },
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;
    use tokio::time::Instant;
    use tokio_stream::wrappers::UnboundedReceiverStream;

    #[tokio::test(start_paused = true)]
    async fn test_burst_collapses_to_last() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut out = Box::pin(debounce(
            UnboundedReceiverStream::new(rx),
            Duration::from_millis(300),
        ));

        tokio::spawn(async move {
            for query in ["a", "ab", "abc"] {
                tx.send(query).unwrap();
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        });

        let start = Instant::now();
        assert_eq!(out.next().await, Some("abc"));
        // last item sent at 200ms, quiet period 300ms
        assert!(start.elapsed() >= Duration::from_millis(500));
        assert_eq!(out.next().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spaced_items_all_pass() {
        let (tx, rx) = mpsc::unbounded_channel();
        let out = debounce(UnboundedReceiverStream::new(rx), Duration::from_millis(300));

        tokio::spawn(async move {
            tx.send("a").unwrap();
            tokio::time::sleep(Duration::from_millis(400)).await;
            tx.send("ab").unwrap();
        });

        let values: Vec<_> = out.collect().await;
        assert_eq!(values, vec!["a", "ab"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_flushed_on_end() {
        let out = debounce(stream::iter(vec![1, 2, 3]), Duration::from_secs(10));
        let start = Instant::now();

        let values: Vec<_> = out.collect().await;
        assert_eq!(values, vec![3]);
        assert!(start.elapsed() < Duration::from_secs(10));
    }
}
