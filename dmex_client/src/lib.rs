#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

pub mod client;
pub mod error;
pub mod retry;

pub use client::{ApiConfig, DEFAULT_ENDPOINT, DmeApiClient};
pub use error::SubmitError;
pub use retry::{RetryPolicy, retry_with_backoff};
