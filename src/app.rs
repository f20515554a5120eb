// Application state shared across handlers
use std::sync::Arc;

use crate::{
    app_config::AppConfig,
    config::RateLimitingConfig,
    db::Store,
    services::{
        ApplicationService, AuthService, CallbackService, ConsultationService, JwtService,
        RateLimitService, StateService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn Store>,
    pub jwt_service: Arc<JwtService>,
    pub rate_limit_service: Arc<RateLimitService>,
    pub application_service: Arc<ApplicationService>,
    pub consultation_service: Arc<ConsultationService>,
    pub callback_service: Arc<CallbackService>,
    pub state_service: Arc<StateService>,
    pub auth_service: Arc<AuthService>,
}

impl AppState {
    /// Wire every service against one store
    pub fn new(config: AppConfig, store: Arc<dyn Store>) -> Self {
        let jwt_service = Arc::new(JwtService::from_app_config(&config.jwt));
        let rate_limit_service = Arc::new(RateLimitService::new(
            RateLimitingConfig::from_security_config(&config.security),
        ));

        Self {
            application_service: Arc::new(ApplicationService::new(store.clone())),
            consultation_service: Arc::new(ConsultationService::new(store.clone())),
            callback_service: Arc::new(CallbackService::new(store.clone())),
            state_service: Arc::new(StateService::new(store.clone())),
            auth_service: Arc::new(AuthService::new(store.clone(), jwt_service.clone())),
            config: Arc::new(config),
            store,
            jwt_service,
            rate_limit_service,
        }
    }
}
