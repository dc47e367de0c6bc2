//! Repeating fetch.

use futures::{stream, Future, Stream};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    First,
    Waiting,
    Finished,
}

/// Invoke `producer`, emit its result, wait `interval`, and repeat.
///
/// The first fetch happens on the first poll, not at construction. A failed
/// fetch is yielded once and ends the stream. The wait between fetches is
/// driven by the consumer, so there is no background timer and dropping the
/// stream cancels an in-flight fetch or wait.
///
/// # Example
///
/// ```ignore
/// let live = repeat_fetch(Duration::from_secs(3), move || {
///     let repo = repo.clone();
///     async move { repo.rates().await }
/// });
/// ```
pub fn repeat_fetch<T, E, F, Fut>(
    interval: Duration,
    producer: F,
) -> impl Stream<Item = Result<T, E>> + Send + 'static
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    stream::unfold(
        (producer, Phase::First),
        move |(mut producer, phase)| async move {
            match phase {
                Phase::Finished => return None,
                Phase::Waiting => tokio::time::sleep(interval).await,
                Phase::First => {}
            }

            match producer().await {
                Ok(value) => Some((Ok(value), (producer, Phase::Waiting))),
                Err(err) => Some((Err(err), (producer, Phase::Finished))),
            }
        },
    )
}
