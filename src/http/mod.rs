//! HTTP transport module
//!
//! Provides the `Transport` seam used by the harvester and its reqwest-backed
//! implementation.
//!
//! # Features
//!
//! - **Typed failures**: transport, HTTP status and decode errors are distinct
//! - **Opt-in retries**: constant, linear and exponential backoff, honouring `Retry-After`
//! - **Rate limiting**: governor pacing plus an in-flight concurrency cap

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig, Transport};
pub use rate_limit::{RateLimiter, RateLimiterConfig, RatePermit};
