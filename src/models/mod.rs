// Database models and request/response types

/// Display plus diesel Text (de)serialization for enums with `as_str` and `FromStr`
macro_rules! text_column_enum {
    ($ty:ty) => {
        impl ::std::fmt::Display for $ty {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl<DB> diesel::deserialize::FromSql<diesel::sql_types::Text, DB> for $ty
        where
            DB: diesel::backend::Backend,
            String: diesel::deserialize::FromSql<diesel::sql_types::Text, DB>,
        {
            fn from_sql(bytes: DB::RawValue<'_>) -> diesel::deserialize::Result<Self> {
                let value = String::from_sql(bytes)?;
                <Self as ::std::str::FromStr>::from_str(&value).map_err(|e| e.into())
            }
        }

        impl<DB> diesel::serialize::ToSql<diesel::sql_types::Text, DB> for $ty
        where
            DB: diesel::backend::Backend,
            str: diesel::serialize::ToSql<diesel::sql_types::Text, DB>,
        {
            fn to_sql<'b>(
                &'b self,
                out: &mut diesel::serialize::Output<'b, '_, DB>,
            ) -> diesel::serialize::Result {
                self.as_str().to_sql(out)
            }
        }
    };
}

pub mod application;
pub mod auth;
pub mod callback_request;
pub mod consultation;
pub mod pagination;
pub mod state;
pub mod status;
pub mod user;

// Re-export common types
pub use application::*;
pub use auth::*;
pub use callback_request::*;
pub use consultation::*;
pub use pagination::*;
pub use state::*;
pub use status::*;
pub use user::*;
