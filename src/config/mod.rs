// Configuration module
// Rate limiting configuration derived from AppConfig

pub mod rate_limit;

pub use rate_limit::RateLimitingConfig;
