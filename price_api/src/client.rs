use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::ClientBuilder as BaseClientBuilder;
use reqwest_middleware::{ClientBuilder as RetryableClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde_json::Value;
use tracing::{debug, info};

use common::probes::Clock;

use crate::errors::PriceApiError;
use crate::extract::{SupplementaryPrice, extract_supplementary};

const API_TIMEOUT_SECS: u64 = 2;
const RETRY_MIN_MS_BACKOFF: u64 = 150;
const RETRY_MAX_MS_BACKOFF: u64 = 300;
const MAX_RETRY: u32 = 1;
pub const CACHE_TTL_SECS: u64 = 600;

const USER_AGENT: &str = "cardtracker/1.0";

static REQWEST_CLIENT: OnceLock<ClientWithMiddleware> = OnceLock::new();

/// Remote quotes for individual cards. Implementations must degrade, never
/// fail: a card the remote side cannot price is None.
#[async_trait]
pub trait SupplementaryPriceSource: Send + Sync {
    async fn card_market_price(&self, card_id: &str) -> Option<SupplementaryPrice>;
}

/// Stand-in for when the remote source is disabled. Every card is simply
/// unpriced.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPriceSource;

#[async_trait]
impl SupplementaryPriceSource for NoopPriceSource {
    async fn card_market_price(&self, _card_id: &str) -> Option<SupplementaryPrice> {
        None
    }
}

/// Short-TTL response cache keyed by request URL. Remote quotes move
/// slowly; hammering the remote API per page view buys nothing.
pub(crate) struct ResponseCache {
    ttl_secs: u64,
    clock: Box<dyn Clock>,
    entries: Mutex<HashMap<String, (u64, Value)>>,
}

impl ResponseCache {
    pub(crate) fn new(ttl_secs: u64, clock: Box<dyn Clock>) -> Self {
        Self {
            ttl_secs,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn get(&self, key: &str) -> Option<Value> {
        let entries = self.lock_entries();
        let (stored_at, body) = entries.get(key)?;

        if self.clock.now().saturating_sub(*stored_at) < self.ttl_secs {
            debug!("Cache hit for {key}");
            return Some(body.clone());
        }

        None
    }

    pub(crate) fn put(&self, key: String, body: Value) {
        let stored_at = self.clock.now();
        self.lock_entries().insert(key, (stored_at, body));
    }

    fn lock_entries(&self) -> MutexGuard<'_, HashMap<String, (u64, Value)>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Client for a pokemontcg.io-compatible card API.
pub struct RemotePriceSource {
    base_url: String,
    api_key: String,
    cache: ResponseCache,
}

impl RemotePriceSource {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, clock: Box<dyn Clock>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            cache: ResponseCache::new(CACHE_TTL_SECS, clock),
        }
    }

    fn create_client() -> &'static ClientWithMiddleware {
        REQWEST_CLIENT.get_or_init(|| {
            let base_client = BaseClientBuilder::new()
                .gzip(true)
                .timeout(Duration::from_secs(API_TIMEOUT_SECS))
                .user_agent(USER_AGENT)
                .https_only(true)
                .build()
                .expect("Valid base reqwest to be built");

            let retry_strat = ExponentialBackoff::builder()
                .retry_bounds(
                    Duration::from_millis(RETRY_MIN_MS_BACKOFF),
                    Duration::from_millis(RETRY_MAX_MS_BACKOFF),
                )
                .build_with_max_retries(MAX_RETRY);
            let retry_middleware = RetryTransientMiddleware::new_with_policy(retry_strat);

            RetryableClientBuilder::new(base_client)
                .with(retry_middleware)
                .build()
        })
    }

    async fn fetch_json(&self, url: &str) -> Result<Value, PriceApiError> {
        if let Some(cached) = self.cache.get(url) {
            return Ok(cached);
        }

        let client = Self::create_client();

        info!("Fetching remote card data from {url}");

        let response = client
            .get(url)
            .header("X-Api-Key", &self.api_key)
            .header("Accept", "application/json")
            .send()
            .await?
            .error_for_status()?;

        let body: Value = response.json().await?;
        self.cache.put(url.to_string(), body.clone());

        Ok(body)
    }
}

#[async_trait]
impl SupplementaryPriceSource for RemotePriceSource {
    async fn card_market_price(&self, card_id: &str) -> Option<SupplementaryPrice> {
        let url = format!("{}/cards/{card_id}", self.base_url);

        match self.fetch_json(&url).await {
            Ok(body) => extract_supplementary(&body),
            Err(err) => {
                debug!("Remote price lookup for {card_id} failed: {err}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};

    use serde_json::json;

    #[derive(Clone, Default)]
    struct FakeClock {
        now: Arc<AtomicU64>,
    }

    impl FakeClock {
        fn advance(&self, secs: u64) {
            self.now.fetch_add(secs, Ordering::SeqCst);
        }
    }

    impl Clock for FakeClock {
        fn now(&self) -> u64 {
            self.now.load(Ordering::SeqCst)
        }
    }

    #[test]
    fn cached_bodies_are_served_inside_the_ttl() {
        let clock = FakeClock::default();
        let cache = ResponseCache::new(CACHE_TTL_SECS, Box::new(clock.clone()));

        cache.put("cards/base1-4".to_string(), json!({"data": {}}));
        clock.advance(CACHE_TTL_SECS - 1);
        assert!(cache.get("cards/base1-4").is_some());
    }

    #[test]
    fn entries_expire_after_the_ttl() {
        let clock = FakeClock::default();
        let cache = ResponseCache::new(CACHE_TTL_SECS, Box::new(clock.clone()));

        cache.put("cards/base1-4".to_string(), json!({"data": {}}));
        clock.advance(CACHE_TTL_SECS);
        assert!(cache.get("cards/base1-4").is_none());
    }

    #[test]
    fn keys_are_independent() {
        let clock = FakeClock::default();
        let cache = ResponseCache::new(CACHE_TTL_SECS, Box::new(clock.clone()));

        cache.put("cards/base1-4".to_string(), json!({"a": 1}));
        assert!(cache.get("cards/base1-5").is_none());
    }

    #[tokio::test]
    async fn noop_source_never_prices_anything() {
        assert!(NoopPriceSource.card_market_price("base1-4").await.is_none());
    }
}
