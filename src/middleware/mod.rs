// HTTP middleware: token resolution, CORS, rate limiting, error detail

pub mod auth;
pub mod auth_middleware;
pub mod cors;
pub mod error_detail;
pub mod rate_limit;

pub use auth::{AdminUser, AuthFailure, AuthenticatedUser};
pub use auth_middleware::auth_middleware;
pub use cors::cors_middleware;
pub use error_detail::error_detail_middleware;
pub use rate_limit::rate_limit_middleware;
