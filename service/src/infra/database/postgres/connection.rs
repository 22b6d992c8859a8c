//! Raw Postgres [`Connection`]s.

use std::{fmt, future::Future};

use futures::{FutureExt as _, TryFutureExt as _};
use ouroboros::self_referencing;
use tokio_postgres::{types::ToSql, Row, ToStatement};
use tracerr::Traced;

use crate::infra::database::{self, postgres};

pub use deadpool_postgres::{
    Client as Pooled, CreatePoolError as PoolCreationError, Pool, PoolError,
};
pub use tokio_postgres::Error;

/// Postgres transaction owning the [`Pooled`] connection it runs in.
#[self_referencing]
pub struct Tx {
    /// [`Pooled`] connection the transaction runs in.
    conn: Pooled,

    /// Transaction running in the `conn`.
    ///
    /// [`None`] once committed.
    #[borrows(mut conn)]
    #[not_covariant]
    tx: Option<deadpool_postgres::Transaction<'this>>,
}

impl fmt::Debug for Tx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with_tx(|tx| f.debug_tuple("Tx").field(tx).finish())
    }
}

impl Tx {
    /// Begins a new [`Tx`] in the provided [`Pooled`] connection.
    ///
    /// # Errors
    ///
    /// If the `BEGIN` statement fails.
    pub async fn begin(conn: Pooled) -> Result<Self, Traced<database::Error>> {
        Self::try_new_async_send(conn, |c| c.transaction().map_ok(Some).boxed())
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)
    }

    /// Returns the running transaction of this [`Tx`].
    fn running(&self) -> &deadpool_postgres::Transaction<'_> {
        // `Tx` is consumed by `commit()`, so it is always running here.
        self.with_tx(|tx| tx.as_ref().expect("committed `Tx` is consumed"))
    }

    /// Commits this [`Tx`].
    ///
    /// # Errors
    ///
    /// If the `COMMIT` statement fails.
    pub async fn commit(mut self) -> Result<(), Traced<database::Error>> {
        #[expect(
            clippy::redundant_closure_for_method_calls,
            reason = "`Option::take` doesn't fit the invariant lifetime"
        )]
        let tx = self.with_tx_mut(|tx| tx.take());
        let Some(tx) = tx else {
            return Ok(());
        };
        tx.commit()
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)
    }
}

/// Connection to run SQL statements in.
pub trait Connection {
    /// Runs the provided statement returning all the resulting [`Row`]s.
    ///
    /// # Errors
    ///
    /// If the statement fails.
    fn query<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = Result<Vec<Row>, Traced<database::Error>>>
    where
        T: ToStatement + ?Sized;

    /// Runs the provided statement returning at most one resulting [`Row`].
    ///
    /// # Errors
    ///
    /// If the statement fails or returns more than one [`Row`].
    fn query_opt<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = Result<Option<Row>, Traced<database::Error>>>
    where
        T: ToStatement + ?Sized;

    /// Runs the provided statement returning the number of affected rows.
    ///
    /// # Errors
    ///
    /// If the statement fails.
    fn exec<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = Result<u64, Traced<database::Error>>>
    where
        T: ToStatement + ?Sized;
}

/// Implements [`Connection`] for a type, whose `tokio_postgres` client is
/// reachable with the provided expression.
macro_rules! impl_connection {
    ($ty:ty, |$this:ident| $client:expr) => {
        impl Connection for $ty {
            async fn query<T>(
                &self,
                stmt: &T,
                params: &[&(dyn ToSql + Sync)],
            ) -> Result<Vec<Row>, Traced<database::Error>>
            where
                T: ToStatement + ?Sized,
            {
                let $this = self;
                $client
                    .query(stmt, params)
                    .await
                    .map_err(tracerr::from_and_wrap!(=> postgres::Error))
                    .map_err(tracerr::map_from)
            }

            async fn query_opt<T>(
                &self,
                stmt: &T,
                params: &[&(dyn ToSql + Sync)],
            ) -> Result<Option<Row>, Traced<database::Error>>
            where
                T: ToStatement + ?Sized,
            {
                let $this = self;
                $client
                    .query_opt(stmt, params)
                    .await
                    .map_err(tracerr::from_and_wrap!(=> postgres::Error))
                    .map_err(tracerr::map_from)
            }

            async fn exec<T>(
                &self,
                stmt: &T,
                params: &[&(dyn ToSql + Sync)],
            ) -> Result<u64, Traced<database::Error>>
            where
                T: ToStatement + ?Sized,
            {
                let $this = self;
                $client
                    .execute(stmt, params)
                    .await
                    .map_err(tracerr::from_and_wrap!(=> postgres::Error))
                    .map_err(tracerr::map_from)
            }
        }
    };
}

// Dereferenced twice, so `Connection` methods don't shadow the client ones.
impl_connection!(Pooled, |c| (**c));
impl_connection!(Tx, |c| c.running());
