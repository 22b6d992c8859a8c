//! In-memory [`Database`] implementation.
//!
//! Transactions are serialized: a [`Tx`] holds the whole [`State`] locked
//! until it's committed or dropped, and its writes are staged on a copy of
//! the [`State`], so dropping an uncommitted [`Tx`] rolls them back.

mod impls;

use std::{collections::HashMap, future::Future, sync::Arc};

use common::operations::{Commit, Transact};
use derive_more::{Display, Error as StdError};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracerr::Traced;

use crate::{
    domain::{
        category, client, employee, equipment, rental, return_record,
        Category, Client, Employee, Equipment, Rental, ReturnRecord,
    },
    infra::database,
};
#[cfg(doc)]
use crate::infra::Database;

/// In-memory [`Database`] client.
#[derive(Clone, Debug, Default)]
pub struct Memory<T = NonTx>(T);

impl Memory {
    /// Creates a new empty [`Memory`] client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Stored entities.
#[derive(Clone, Debug, Default)]
pub struct State {
    /// Stored [`Category`]s.
    categories: HashMap<category::Id, Category>,

    /// Stored [`Equipment`].
    equipment: HashMap<equipment::Id, Equipment>,

    /// Stored [`Client`]s.
    clients: HashMap<client::Id, Client>,

    /// Stored [`Employee`]s.
    employees: HashMap<employee::Id, Employee>,

    /// Stored [`Rental`]s.
    rentals: HashMap<rental::Id, Rental>,

    /// Stored [`ReturnRecord`]s.
    returns: HashMap<return_record::Id, ReturnRecord>,
}

/// Non-transactional [`Memory`] client, applying every write immediately.
#[derive(Clone, Debug, Default)]
pub struct NonTx {
    /// Shared [`State`].
    state: Arc<Mutex<State>>,
}

/// Transactional [`Memory`] client.
#[derive(Clone, Debug)]
pub struct Tx {
    /// Staged [`State`] along with the lock of the shared one, taken on
    /// [`Commit`].
    staged: Arc<Mutex<Option<(OwnedMutexGuard<State>, State)>>>,
}

/// Generic [`Memory`] connection.
pub trait Connection {
    /// Reads the [`State`] with the provided function.
    ///
    /// # Errors
    ///
    /// If the transaction is already committed.
    fn read<R>(
        &self,
        f: impl FnOnce(&State) -> R,
    ) -> impl Future<Output = Result<R, Traced<database::Error>>>;

    /// Modifies the [`State`] with the provided function.
    ///
    /// # Errors
    ///
    /// If the transaction is already committed.
    fn write<R>(
        &self,
        f: impl FnOnce(&mut State) -> R,
    ) -> impl Future<Output = Result<R, Traced<database::Error>>>;
}

impl Connection for NonTx {
    async fn read<R>(
        &self,
        f: impl FnOnce(&State) -> R,
    ) -> Result<R, Traced<database::Error>> {
        Ok(f(&*self.state.lock().await))
    }

    async fn write<R>(
        &self,
        f: impl FnOnce(&mut State) -> R,
    ) -> Result<R, Traced<database::Error>> {
        Ok(f(&mut *self.state.lock().await))
    }
}

impl Connection for Tx {
    async fn read<R>(
        &self,
        f: impl FnOnce(&State) -> R,
    ) -> Result<R, Traced<database::Error>> {
        self.staged
            .lock()
            .await
            .as_ref()
            .map(|(_, state)| f(state))
            .ok_or_else(|| tracerr::new!(Error::TxClosed))
            .map_err(tracerr::map_from)
    }

    async fn write<R>(
        &self,
        f: impl FnOnce(&mut State) -> R,
    ) -> Result<R, Traced<database::Error>> {
        self.staged
            .lock()
            .await
            .as_mut()
            .map(|(_, state)| f(state))
            .ok_or_else(|| tracerr::new!(Error::TxClosed))
            .map_err(tracerr::map_from)
    }
}

impl<C: Connection> Memory<C> {
    /// Reads the [`State`] with the provided function.
    async fn read<R>(
        &self,
        f: impl FnOnce(&State) -> R,
    ) -> Result<R, Traced<database::Error>> {
        self.0.read(f).await
    }

    /// Modifies the [`State`] with the provided function.
    async fn write<R>(
        &self,
        f: impl FnOnce(&mut State) -> R,
    ) -> Result<R, Traced<database::Error>> {
        self.0.write(f).await
    }
}

impl database::Database<Transact> for Memory<NonTx> {
    type Ok = Memory<Tx>;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        let guard = Arc::clone(&self.0.state).lock_owned().await;
        let staged = guard.clone();
        Ok(Memory(Tx {
            staged: Arc::new(Mutex::new(Some((guard, staged)))),
        }))
    }
}

impl database::Database<Transact> for Memory<Tx> {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl database::Database<Commit> for Memory<Tx> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        let (mut guard, staged) = self
            .0
            .staged
            .lock()
            .await
            .take()
            .ok_or_else(|| tracerr::new!(Error::TxClosed))
            .map_err(tracerr::map_from)?;
        *guard = staged;
        Ok(())
    }
}

/// [`Memory`] database error.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// Unique constraint is violated.
    #[display("Unique constraint `{_0}` is violated")]
    UniqueViolation(#[error(not(source))] &'static str),

    /// Transaction is already committed.
    #[display("Transaction is already committed")]
    TxClosed,
}

impl Error {
    /// Checks if the error is a unique violation of the specified constraint.
    #[must_use]
    pub fn is_unique_violation(&self, constraint: Option<&str>) -> bool {
        match self {
            Self::UniqueViolation(c) => constraint.map_or(true, |x| x == *c),
            Self::TxClosed => false,
        }
    }
}
