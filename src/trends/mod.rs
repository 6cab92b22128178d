pub mod fallback;
pub mod google;
pub mod provider;
pub mod realtime;
pub mod related;
pub mod types;

#[cfg(test)]
pub mod mock;

use provider::{TrendsError, TrendsProvider};
use std::sync::Arc;
use std::time::Duration;

/// Outcome of asking one region for data.
#[derive(Debug)]
pub enum RegionAttempt<T> {
    Found(T),
    Empty,
    Failed(TrendsError),
}

/// Region-fallback orchestration over a [`TrendsProvider`].
///
/// Every provider call is preceded by a fixed pause so consecutive region
/// attempts do not hammer the upstream API. Nothing here returns an error:
/// when every region fails the caller gets a fallback payload instead.
pub struct TrendsService {
    provider: Arc<dyn TrendsProvider>,
    request_delay: Duration,
}

impl TrendsService {
    pub fn new(provider: Arc<dyn TrendsProvider>, request_delay: Duration) -> Self {
        Self {
            provider,
            request_delay,
        }
    }

    async fn pause(&self) {
        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }
    }
}
