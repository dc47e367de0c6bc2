//! Unified error handling for ratewatch.
//!
//! - **Error Categories**: high-level classification used for retry decisions
//! - **Domain-specific Errors**: network and storage errors
//! - **Unified Error Type**: `AppError` consolidates them
//! - **Result Type Alias**: `AppResult<T>`
//!
//! | Category | Description | Retryable |
//! |----------|-------------|-----------|
//! | Network | Connection, DNS, timeout | Yes |
//! | Server | 5xx, rate limiting, bad payloads | Yes |
//! | Storage | Favorites/settings files | No |
//! | Client | 4xx such as unknown rate id | No |
//! | Configuration | Bad environment values | No |

mod app_error;
mod category;
mod network;
mod result;
mod storage;

pub use app_error::AppError;
pub use category::ErrorCategory;
pub use network::{classify_reqwest_error, classify_status, NetworkError};
pub use result::AppResult;
pub use storage::StorageError;
