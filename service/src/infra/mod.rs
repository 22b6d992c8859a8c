//! Infrastructure the rental [`Service`](crate::Service) runs on.
//!
//! Only storage is needed: PostgreSQL in production and an in-memory store
//! for tests and local experiments.

pub mod database;

pub use self::database::Database;
#[cfg(any(feature = "memory", test))]
pub use self::database::{memory, Memory};
#[cfg(feature = "postgres")]
pub use self::database::{postgres, Postgres};
