//! Combine-latest over two live streams.

use futures::{stream, Stream, StreamExt};

use super::LiveStream;
use crate::error::AppResult;

enum Side<A, B> {
    Left(A),
    Right(B),
}

struct Latest<S, A, B, F> {
    merged: S,
    left: Option<A>,
    right: Option<B>,
    project: F,
    failed: bool,
}

/// Emit `project(&latest_a, &latest_b)` whenever either input emits, once
/// both inputs have emitted at least once.
///
/// An `Err` from either side is forwarded and ends the combined stream. The
/// combined stream ends normally once both inputs have ended.
pub fn combine_latest<A, B, O, SA, SB, F>(a: SA, b: SB, project: F) -> LiveStream<O>
where
    A: Send + 'static,
    B: Send + 'static,
    O: Send + 'static,
    SA: Stream<Item = AppResult<A>> + Send + 'static,
    SB: Stream<Item = AppResult<B>> + Send + 'static,
    F: FnMut(&A, &B) -> O + Send + 'static,
{
    let left = a.map(|item| item.map(Side::Left));
    let right = b.map(|item| item.map(Side::Right));

    let state = Latest {
        merged: stream::select(left.boxed(), right.boxed()),
        left: None,
        right: None,
        project,
        failed: false,
    };

    stream::unfold(state, |mut st| async move {
        if st.failed {
            return None;
        }

        loop {
            match st.merged.next().await? {
                Err(err) => {
                    st.failed = true;
                    return Some((Err(err), st));
                }
                Ok(Side::Left(a)) => st.left = Some(a),
                Ok(Side::Right(b)) => st.right = Some(b),
            }

            if let (Some(a), Some(b)) = (&st.left, &st.right) {
                let out = (st.project)(a, b);
                return Some((Ok(out), st));
            }
        }
    })
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, NetworkError};
    use futures::channel::mpsc;

    fn boom() -> AppError {
        AppError::Network(NetworkError::Timeout {
            operation: "fetch".to_string(),
            duration_secs: 15,
        })
    }

    #[tokio::test]
    async fn test_no_output_until_both_emit() {
        let (tx_a, rx_a) = mpsc::unbounded::<AppResult<u32>>();
        let (tx_b, rx_b) = mpsc::unbounded::<AppResult<&'static str>>();
        let mut combined = combine_latest(rx_a, rx_b, |a, b| format!("{}{}", a, b));

        tx_a.unbounded_send(Ok(1)).unwrap();
        tx_b.unbounded_send(Ok("x")).unwrap();
        assert_eq!(combined.next().await, Some(Ok("1x".to_string())));

        tx_a.unbounded_send(Ok(2)).unwrap();
        assert_eq!(combined.next().await, Some(Ok("2x".to_string())));

        tx_b.unbounded_send(Ok("y")).unwrap();
        assert_eq!(combined.next().await, Some(Ok("2y".to_string())));
    }

    #[tokio::test]
    async fn test_left_alone_emits_nothing() {
        let (tx_a, rx_a) = mpsc::unbounded::<AppResult<u32>>();
        let (_tx_b, rx_b) = mpsc::unbounded::<AppResult<u32>>();
        let mut combined = combine_latest(rx_a, rx_b, |a, b| a + b);

        tx_a.unbounded_send(Ok(1)).unwrap();
        let pending = tokio::time::timeout(std::time::Duration::from_millis(20), combined.next()).await;
        assert!(pending.is_err());
    }

    #[tokio::test]
    async fn test_error_terminates() {
        let a = stream::iter(vec![Ok(1), Err(boom())]);
        let b = stream::iter(vec![Ok(10)]);

        let values: Vec<_> = combine_latest(a, b, |a, b| a + b).collect().await;

        assert_eq!(values.last(), Some(&Err(boom())));
        assert!(values[..values.len() - 1].iter().all(|v| v == &Ok(11)));
    }

    #[tokio::test]
    async fn test_ends_when_both_inputs_end() {
        let a = stream::iter(vec![Ok(1)]);
        let b = stream::iter(vec![Ok(2)]);

        let values: Vec<_> = combine_latest(a, b, |a, b| a * b).collect().await;
        assert_eq!(values, vec![Ok(2)]);
    }

    #[tokio::test]
    async fn test_one_side_never_emits() {
        let a = stream::iter(vec![Ok(1), Ok(2)]);
        let b = stream::iter(Vec::<AppResult<u32>>::new());

        let values: Vec<_> = combine_latest(a, b, |a, b| a + b).collect().await;
        assert!(values.is_empty());
    }
}
