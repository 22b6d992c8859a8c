//! Single abstraction every layer of the rental service is built on.

use std::future::Future;

/// Something that asynchronously processes `Args` into a [`Result`].
///
/// A command, a query and a storage backend all implement it, each for its own
/// set of `Args`, so they compose without any extra glue traits.
pub trait Handler<Args = ()> {
    /// Value produced on success.
    type Ok;

    /// Value produced on failure.
    type Err;

    /// Processes the `args`.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
