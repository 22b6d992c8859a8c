//! Read side of the rental [`Service`].
//!
//! Plain lookups (an entity by its ID, a filtered list) are [`DatabaseQuery`]
//! aliases served by a single generic impl below. Queries computing something
//! on top of the stored data (recipe costing, period reports) live in their
//! own modules with dedicated impls.

pub mod categories;
pub mod category;
pub mod client;
pub mod clients;
pub mod employee;
pub mod employees;
pub mod equipment;
pub mod equipments;
pub mod recipe;
pub mod rental;
pub mod rentals;
pub mod report;
pub mod return_record;
pub mod return_records;

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    infra::{database, Database},
    Service,
};

/// Read-only operation of the [`Service`].
pub use common::Handler as Query;

/// [`Query`] answered by a single [`Select`] of the [`Database`], with no
/// extra logic in between.
#[derive(Clone, Copy, Debug)]
#[expect(clippy::module_name_repetitions, reason = "more readable")]
pub struct DatabaseQuery<T>(T);

impl<W, B> DatabaseQuery<By<W, B>> {
    /// Creates a [`DatabaseQuery`] looking up a `W` by the provided `B`.
    #[must_use]
    pub fn by(by: B) -> Self {
        Self(By::new(by))
    }
}

impl<Db, W, B> Query<DatabaseQuery<By<W, B>>> for Service<Db>
where
    Db: Database<Select<By<W, B>>, Ok = W, Err = Traced<database::Error>>,
{
    type Ok = W;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        DatabaseQuery(by): DatabaseQuery<By<W, B>>,
    ) -> Result<Self::Ok, Self::Err> {
        tracing::trace!(of = std::any::type_name::<W>(), "selecting");

        self.database()
            .execute(Select(by))
            .await
            .map_err(tracerr::wrap!())
    }
}
