// In-process rate limiting keyed by client IP
// GCRA via governor: `max_requests` burst, replenished evenly across `window_seconds`

use governor::{
    clock::{Clock, DefaultClock},
    state::keyed::DefaultKeyedStateStore,
    Quota, RateLimiter,
};
use serde::{Deserialize, Serialize};
use std::{num::NonZeroU32, time::Duration};
use tracing::{debug, warn};

use crate::config::RateLimitingConfig;

type KeyedLimiter = RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RateLimitConfig {
    /// Maximum requests allowed in the time window
    pub max_requests: u32,

    /// Time window in seconds
    pub window_seconds: u32,
}

impl RateLimitConfig {
    fn quota(&self) -> Quota {
        let burst = NonZeroU32::new(self.max_requests).unwrap_or(NonZeroU32::MIN);
        let period = Duration::from_secs(u64::from(self.window_seconds.max(1)))
            .checked_div(burst.get())
            .unwrap_or(Duration::from_secs(1));

        Quota::with_period(period)
            .unwrap_or_else(|| Quota::per_second(burst))
            .allow_burst(burst)
    }
}

/// Rate limit check result
#[derive(Debug, Clone, Serialize)]
pub struct RateLimitResult {
    pub allowed: bool,

    /// Quota class that was applied
    pub limit_key: String,

    pub limit: u32,

    /// Seconds until the next request would be admitted (if blocked)
    pub retry_after: Option<u64>,
}

pub struct RateLimitService {
    config: RateLimitingConfig,
    default_limiter: KeyedLimiter,
    endpoint_limiters: Vec<(String, KeyedLimiter)>,
}

impl RateLimitService {
    pub fn new(config: RateLimitingConfig) -> Self {
        let default_limiter = RateLimiter::keyed(config.default.quota());
        let endpoint_limiters = config
            .endpoints
            .iter()
            .map(|(prefix, endpoint)| (prefix.clone(), RateLimiter::keyed(endpoint.quota())))
            .collect();

        Self {
            config,
            default_limiter,
            endpoint_limiters,
        }
    }

    pub fn config(&self) -> &RateLimitingConfig {
        &self.config
    }

    /// Whether this request is subject to limiting at all; `peer_ip` is the socket address
    pub fn applies_to(&self, path: &str, peer_ip: &str) -> bool {
        self.config.enabled && !self.config.is_exempt(path) && !self.config.is_whitelisted(peer_ip)
    }

    /// Count one request from `client_ip` against the quota for `path`
    pub fn check(&self, path: &str, client_ip: &str) -> RateLimitResult {
        let (limit_key, endpoint) = self.config.get_endpoint_config(path);
        let limiter = self
            .endpoint_limiters
            .iter()
            .find(|(prefix, _)| prefix == limit_key)
            .map(|(_, limiter)| limiter)
            .unwrap_or(&self.default_limiter);

        let key = client_ip.to_string();
        match limiter.check_key(&key) {
            Ok(()) => {
                debug!("Rate limit passed for {} on {}", client_ip, limit_key);
                RateLimitResult {
                    allowed: true,
                    limit_key: limit_key.to_string(),
                    limit: endpoint.max_requests,
                    retry_after: None,
                }
            },
            Err(not_until) => {
                let wait = not_until.wait_time_from(DefaultClock::default().now());
                let retry_after = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
                warn!(
                    "Rate limit exceeded for {} on {} (retry in {}s)",
                    client_ip, limit_key, retry_after
                );
                RateLimitResult {
                    allowed: false,
                    limit_key: limit_key.to_string(),
                    limit: endpoint.max_requests,
                    retry_after: Some(retry_after.max(1)),
                }
            },
        }
    }

    /// Drop state for keys whose quota has fully replenished
    pub fn prune(&self) {
        self.default_limiter.retain_recent();
        self.default_limiter.shrink_to_fit();
        for (_, limiter) in &self.endpoint_limiters {
            limiter.retain_recent();
            limiter.shrink_to_fit();
        }
    }
}
