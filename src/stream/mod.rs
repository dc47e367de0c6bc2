//! Stream combinators behind every live screen.
//!
//! - [`repeat_fetch`] - fetch, emit, wait, repeat
//! - [`retry_with_policy`] - resubscribe a failed stream under a [`RetryPolicy`]
//! - [`combine_latest`] - latest-of-both projection of two streams
//! - [`debounce`] - input shaping for search
//!
//! All combinators are lazy: nothing runs until the returned stream is
//! polled, and dropping the stream cancels whatever it was waiting on.

use futures::stream::BoxStream;

use crate::error::AppResult;

pub mod combine;
pub mod debounce;
pub mod repeating;
pub mod retry;

pub use combine::combine_latest;
pub use debounce::debounce;
pub use repeating::repeat_fetch;
pub use retry::{retry_with_policy, RetryPolicy};

/// A boxed, sendable stream of fallible values.
///
/// An `Err` item is always the last item of a `LiveStream`.
pub type LiveStream<T> = BoxStream<'static, AppResult<T>>;
