// Centralized rate limiting configuration
// A default per-IP quota plus stricter quotas for endpoint prefixes

use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::app_config::SecurityConfig;
use crate::services::rate_limit::RateLimitConfig;

/// Paths that are never rate limited
pub const EXEMPT_PATHS: &[&str] = &["/health"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitingConfig {
    pub enabled: bool,

    /// Quota for every path without a more specific entry
    pub default: RateLimitConfig,

    /// (path prefix, quota) pairs; the longest matching prefix wins
    pub endpoints: Vec<(String, RateLimitConfig)>,

    /// Socket peers that bypass limiting
    pub whitelist_ips: Vec<IpAddr>,

    /// Proxies whose `X-Forwarded-For` entries are trusted, counted from the right
    pub trusted_proxy_hops: usize,
}

impl RateLimitingConfig {
    pub fn from_security_config(security: &SecurityConfig) -> Self {
        Self {
            enabled: security.enable_rate_limiting,
            default: RateLimitConfig {
                max_requests: security.rate_limit_max_requests,
                window_seconds: security.rate_limit_window_seconds,
            },
            endpoints: vec![(
                "/api/v1/auth".to_string(),
                RateLimitConfig {
                    max_requests: security.auth_rate_limit_max_requests,
                    window_seconds: security.auth_rate_limit_window_seconds,
                },
            )],
            whitelist_ips: vec![
                IpAddr::from([127, 0, 0, 1]),
                IpAddr::from([0u16, 0, 0, 0, 0, 0, 0, 1]),
            ],
            trusted_proxy_hops: security.trusted_proxy_hops as usize,
        }
    }

    /// Get the quota class for a path: `(key, config)`, `"default"` when nothing matches
    pub fn get_endpoint_config(&self, path: &str) -> (&str, &RateLimitConfig) {
        self.endpoints
            .iter()
            .filter(|(prefix, _)| path.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(prefix, config)| (prefix.as_str(), config))
            .unwrap_or(("default", &self.default))
    }

    pub fn is_exempt(&self, path: &str) -> bool {
        EXEMPT_PATHS.contains(&path)
    }

    pub fn is_whitelisted(&self, ip: &str) -> bool {
        ip.parse::<IpAddr>()
            .map(|addr| self.whitelist_ips.contains(&addr))
            .unwrap_or(false)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        let all = std::iter::once(&self.default).chain(self.endpoints.iter().map(|(_, c)| c));
        for config in all {
            if config.max_requests == 0 {
                return Err("max_requests must be greater than 0".to_string());
            }
            if config.window_seconds == 0 {
                return Err("window_seconds must be greater than 0".to_string());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn security() -> SecurityConfig {
        SecurityConfig {
            cors_allowed_origins: vec![],
            cors_production_domain: None,
            enable_rate_limiting: true,
            rate_limit_window_seconds: 900,
            rate_limit_max_requests: 100,
            auth_rate_limit_window_seconds: 900,
            auth_rate_limit_max_requests: 20,
            trusted_proxy_hops: 0,
        }
    }

    #[test]
    fn test_endpoint_matching() {
        let config = RateLimitingConfig::from_security_config(&security());

        let (key, auth) = config.get_endpoint_config("/api/v1/auth/login");
        assert_eq!(key, "/api/v1/auth");
        assert_eq!(auth.max_requests, 20);

        let (key, default) = config.get_endpoint_config("/api/v1/consultations/public");
        assert_eq!(key, "default");
        assert_eq!(default.max_requests, 100);
    }

    #[test]
    fn test_whitelist_and_exempt() {
        let config = RateLimitingConfig::from_security_config(&security());
        assert!(config.is_whitelisted("127.0.0.1"));
        assert!(config.is_whitelisted("::1"));
        assert!(!config.is_whitelisted("203.0.113.9"));
        assert!(!config.is_whitelisted("unknown"));
        assert!(config.is_exempt("/health"));
        assert!(!config.is_exempt("/api/v1/states"));
    }

    #[test]
    fn test_validate_rejects_zero() {
        let mut security = security();
        security.auth_rate_limit_max_requests = 0;
        assert!(RateLimitingConfig::from_security_config(&security)
            .validate()
            .is_err());
    }
}
