// Utility modules for the RTI backend

pub mod api_error;
pub mod audit_logger;
pub mod password;
pub mod response;
pub mod validation;

pub use api_error::{field_errors, ApiError, ApiResult, InternalErrorDetail};
pub use audit_logger::{AuditAction, AuditLogger};
pub use password::{hash_password, verify_dummy_password, verify_password, PasswordError};
pub use response::{ApiResponse, FieldError};
