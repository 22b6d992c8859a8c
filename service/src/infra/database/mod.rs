//! [`Database`]-related implementations.

#[cfg(any(feature = "memory", test))]
pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

use derive_more::{Display, Error as StdError, From};

#[cfg(any(feature = "memory", test))]
pub use self::memory::Memory;
#[cfg(feature = "postgres")]
pub use self::postgres::Postgres;

/// Database operation.
pub use common::Handler as Database;

pub mod constraint {
    //! Names of the unique constraints reported by [`Error`]s.
    //!
    //! [`Error`]: super::Error

    /// At most one [`ReturnRecord`] per [`Rental`].
    ///
    /// [`Rental`]: crate::domain::Rental
    /// [`ReturnRecord`]: crate::domain::ReturnRecord
    pub const RETURN_RENTAL_ID: &str = "returns_rental_id_key";

    /// [`Employee`] emails are unique.
    ///
    /// [`Employee`]: crate::domain::Employee
    pub const EMPLOYEE_EMAIL: &str = "employees_email_key";
}

/// [`Database`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// [`Memory`] error.
    #[cfg(any(feature = "memory", test))]
    Memory(memory::Error),

    /// [`Postgres`] error.
    #[cfg(feature = "postgres")]
    Postgres(postgres::Error),
}

impl Error {
    /// Checks if the error is a unique violation of the specified constraint.
    #[must_use]
    pub fn is_unique_violation(&self, constraint: Option<&str>) -> bool {
        match self {
            #[cfg(any(feature = "memory", test))]
            Self::Memory(e) => e.is_unique_violation(constraint),
            #[cfg(feature = "postgres")]
            Self::Postgres(e) => e.is_unique_violation(constraint),
        }
    }
}
