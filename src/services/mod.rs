// Business logic layer

pub mod application;
pub mod auth;
pub mod callback;
pub mod consultation;
pub mod jwt;
pub mod rate_limit;
pub mod state;

pub use application::ApplicationService;
pub use auth::AuthService;
pub use callback::CallbackService;
pub use consultation::ConsultationService;
pub use jwt::{JwtConfig, JwtError, JwtService};
pub use rate_limit::{RateLimitConfig, RateLimitResult, RateLimitService};
pub use state::StateService;
