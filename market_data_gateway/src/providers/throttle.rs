//! Client-side request budget shared by every call through one provider.

use std::num::NonZeroU32;

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};

pub(crate) struct Throttle {
    limiter: DefaultDirectRateLimiter,
}

impl Throttle {
    pub(crate) fn per_minute(max_requests: NonZeroU32) -> Self {
        Self {
            limiter: RateLimiter::direct(Quota::per_minute(max_requests)),
        }
    }

    /// Waits until one request may be sent. Never fails and never issues a call.
    pub(crate) async fn acquire(&self) {
        self.limiter.until_ready().await;
    }
}
