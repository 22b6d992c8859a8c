//! Postgres [`Database`] clients.
//!
//! [`Database`]: crate::infra::Database

use std::sync::Arc;

use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard};
use tokio_postgres::{types::ToSql, Row, ToStatement};
use tracerr::Traced;

use crate::infra::database::{
    self,
    postgres::{self, connection, Connection},
};

/// Non-transactional client, checking out a pooled connection per statement.
#[derive(Clone, Debug)]
pub struct NonTx {
    /// [`connection::Pool`] to check connections out of.
    pool: connection::Pool,
}

impl NonTx {
    /// Creates a new [`NonTx`] client over the provided [`connection::Pool`].
    #[must_use]
    pub(crate) const fn from_pool(pool: connection::Pool) -> Self {
        Self { pool }
    }

    /// Returns the [`connection::Pool`] of this client.
    #[must_use]
    pub(crate) const fn pool(&self) -> &connection::Pool {
        &self.pool
    }

    /// Checks a [`connection::Pooled`] connection out of the pool.
    pub(crate) async fn checkout(
        &self,
    ) -> Result<connection::Pooled, Traced<database::Error>> {
        self.pool
            .get()
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)
    }
}

/// Transactional client, beginning its [`connection::Tx`] on first use.
///
/// Dropping the last clone without [`Tx::commit()`] rolls the transaction
/// back.
#[derive(Clone, Debug)]
pub struct Tx {
    /// [`NonTx`] client to check the transaction connection out of.
    non_tx: NonTx,

    /// Lazily begun [`connection::Tx`].
    tx: Arc<Mutex<Option<connection::Tx>>>,
}

impl Tx {
    /// Creates a new [`Tx`] client out of the provided [`NonTx`] one.
    #[must_use]
    pub fn from_non_tx(non_tx: NonTx) -> Self {
        Self {
            non_tx,
            tx: Arc::new(Mutex::new(None)),
        }
    }

    /// Returns the running [`connection::Tx`], beginning it if required.
    async fn running(
        &self,
    ) -> Result<MappedMutexGuard<'_, connection::Tx>, Traced<database::Error>>
    {
        let mut guard = self.tx.lock().await;
        if guard.is_none() {
            let conn = self.non_tx.checkout().await.map_err(tracerr::wrap!())?;
            *guard = Some(
                connection::Tx::begin(conn)
                    .await
                    .map_err(tracerr::wrap!())?,
            );
        }
        // `None` has been replaced with a begun `connection::Tx` above.
        Ok(MutexGuard::map(guard, |tx| {
            tx.as_mut().expect("`connection::Tx` is begun")
        }))
    }

    /// Commits this [`Tx`] client.
    ///
    /// Does nothing if no statement has been run.
    ///
    /// # Errors
    ///
    /// If the `COMMIT` statement fails.
    pub async fn commit(&self) -> Result<(), Traced<database::Error>> {
        let tx = self.tx.lock().await.take();
        match tx {
            Some(tx) => tx.commit().await.map_err(tracerr::wrap!()),
            None => Ok(()),
        }
    }
}

impl Connection for NonTx {
    async fn query<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        let conn = self.checkout().await.map_err(tracerr::wrap!())?;
        conn.query(stmt, params).await.map_err(tracerr::wrap!())
    }

    async fn query_opt<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Option<Row>, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        let conn = self.checkout().await.map_err(tracerr::wrap!())?;
        conn.query_opt(stmt, params).await.map_err(tracerr::wrap!())
    }

    async fn exec<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<u64, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        let conn = self.checkout().await.map_err(tracerr::wrap!())?;
        conn.exec(stmt, params).await.map_err(tracerr::wrap!())
    }
}

impl Connection for Tx {
    async fn query<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        let tx = self.running().await.map_err(tracerr::wrap!())?;
        tx.query(stmt, params).await.map_err(tracerr::wrap!())
    }

    async fn query_opt<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Option<Row>, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        let tx = self.running().await.map_err(tracerr::wrap!())?;
        tx.query_opt(stmt, params).await.map_err(tracerr::wrap!())
    }

    async fn exec<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<u64, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        let tx = self.running().await.map_err(tracerr::wrap!())?;
        tx.exec(stmt, params).await.map_err(tracerr::wrap!())
    }
}
