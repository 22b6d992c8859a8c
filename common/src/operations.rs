//! Vocabulary of storage operations.
//!
//! Every operation is a thin wrapper around its payload. A storage backend is
//! a [`Handler`] of many of them at once, and the wrapper type alone decides
//! which implementation runs: `Insert(rental)` and `Select(By::new(id))` go to
//! different impls of the very same backend.

use std::marker::PhantomData;

use crate::Handler;

/// Declares a single-field operation wrapper.
macro_rules! define_operation {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(Clone, Copy, Debug)]
        pub struct $name<T>(pub T);
    };
}

define_operation! {
    /// Stores a new entity.
    Insert
}

define_operation! {
    /// Overwrites an already stored entity.
    Update
}

define_operation! {
    /// Removes (or marks as removed) a stored entity.
    Delete
}

define_operation! {
    /// Reads whatever the payload describes.
    Select
}

define_operation! {
    /// Reads whatever the payload describes, holding it exclusively until the
    /// surrounding transaction ends.
    Lock
}

/// Opens a transaction.
#[derive(Clone, Copy, Debug)]
pub struct Transact;

/// Handle of a transaction opened by `T`.
pub type Transacted<T> = <T as Handler<Transact>>::Ok;

/// Commits the transaction it's executed on.
#[derive(Clone, Copy, Debug)]
pub struct Commit;

/// Criterion `B` to look up a `W` with.
///
/// `By<Option<Rental>, rental::Id>` reads as "an optional `Rental` by its ID".
#[derive(Clone, Copy, Debug)]
pub struct By<W, B> {
    /// Looked up type.
    _what: PhantomData<W>,

    /// Criterion itself.
    criterion: B,
}

impl<W, B> By<W, B> {
    /// Wraps the provided `criterion`.
    #[must_use]
    pub fn new(criterion: B) -> Self {
        Self {
            _what: PhantomData,
            criterion,
        }
    }

    /// Borrows the wrapped criterion.
    #[must_use]
    pub fn inner(&self) -> &B {
        &self.criterion
    }

    /// Unwraps the criterion.
    #[must_use]
    pub fn into_inner(self) -> B {
        self.criterion
    }
}
