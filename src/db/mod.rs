pub mod diesel_pool;
pub mod mysql_store;
pub mod store;

pub use diesel_pool::{create_diesel_pool, mask_connection_string, DieselDatabaseConfig, DieselPool};
pub use mysql_store::DieselStore;
pub use store::{
    ApplicationRepository, CallbackRepository, ConsultationRepository, Page, RepositoryError,
    RepositoryResult, StateRepository, Store, UserRepository,
};
