//! Request admission layer.
//!
//! - `cache` - bounded least-recently-used result cache
//! - `rate_limiter` - per-client fixed-window request limiting

pub mod cache;
pub mod rate_limiter;
