//! PostgreSQL-backed [`Database`].
//!
//! Every statement runs on a connection from a [`deadpool_postgres`] pool.
//! [`Postgres<Tx>`] pins a single connection for the whole transaction.

pub mod client;
pub mod connection;
mod impls;
mod like_pattern;

use deadpool_postgres::Runtime;
use derive_more::{Deref, Display, Error as StdError, From};
use tokio_postgres::{error::SqlState, NoTls};
use tracerr::Traced;

use crate::infra::database;
#[cfg(doc)]
use crate::infra::Database;

pub use deadpool_postgres::{Config, PoolConfig};
pub use refinery::embed_migrations;

pub use self::{
    client::{NonTx, Tx},
    connection::Connection,
    like_pattern::LikePattern,
};

/// PostgreSQL [`Database`], either pooled ([`NonTx`]) or bound to a single
/// transaction ([`Tx`]).
#[derive(Clone, Debug, Deref)]
pub struct Postgres<T = NonTx>(T);

impl Postgres {
    /// Sets up a connection pool from the provided [`Config`].
    ///
    /// No connection is opened until the first statement.
    ///
    /// # Errors
    ///
    /// If the [`Config`] is incomplete or contradictory.
    pub fn new(conf: &Config) -> Result<Self, Traced<database::Error>> {
        let pool = conf
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        Ok(Self(NonTx::from_pool(pool)))
    }
}

/// Failure of talking to PostgreSQL.
#[derive(Debug, Display, StdError, From)]
pub enum Error {
    /// Statement was rejected or the connection broke while running it.
    #[display("PostgreSQL statement failed: {_0}")]
    Statement(connection::Error),

    /// [`Config`] doesn't describe a usable [`connection::Pool`].
    #[display("cannot create PostgreSQL pool: {_0}")]
    PoolCreation(connection::PoolCreationError),

    /// No connection could be taken from the [`connection::Pool`].
    #[display("cannot check out PostgreSQL connection: {_0}")]
    Pool(connection::PoolError),
}

impl Error {
    /// Checks whether this is a `UNIQUE` violation of the named `constraint`,
    /// or of any `UNIQUE` constraint if [`None`] is given.
    ///
    /// Used to detect duplicate employee emails and double returns.
    #[must_use]
    pub fn is_unique_violation(&self, constraint: Option<&str>) -> bool {
        let Self::Statement(e) = self else {
            return false;
        };
        e.code() == Some(&SqlState::UNIQUE_VIOLATION)
            && constraint.map_or(true, |c| {
                e.as_db_error().and_then(|e| e.constraint()) == Some(c)
            })
    }
}
