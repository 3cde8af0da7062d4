//! Fraud policy and rate limiting for the KERB network.
//!
//! Both components deliberately fail open: rejecting a legitimate
//! contributor because a backing store is briefly unreachable is judged
//! worse than occasionally under-deduplicating or under-throttling. Every
//! fail-open is logged, never silently swallowed.

pub mod fraud;
pub mod rate;

pub use fraud::{Disposition, FraudPolicy, FraudVerdict};
pub use rate::{RateDecision, RateLimiter};
