//! [`Query`] collection related to a single [`Client`].

use common::operations::{By, Select};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Rental;
use crate::{
    domain::{client, Client},
    infra::{database, Database},
    read, Query, Service,
};

use super::DatabaseQuery;

/// Queries a non-deleted [`Client`] by its [`client::Id`].
pub type ById = DatabaseQuery<By<Option<Client>, client::Id>>;

/// Queries whether a [`Client`] may be deleted, i.e. the [`Client`] has no
/// open [`Rental`]s.
#[derive(Clone, Copy, Debug)]
pub struct CanDelete(pub client::Id);

impl<Db> Query<CanDelete> for Service<Db>
where
    Db: Database<
        Select<By<read::rental::HasOpen, client::Id>>,
        Ok = read::rental::HasOpen,
        Err = Traced<database::Error>,
    >,
{
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        CanDelete(id): CanDelete,
    ) -> Result<Self::Ok, Self::Err> {
        self.database()
            .execute(Select(By::<read::rental::HasOpen, _>::new(id)))
            .await
            .map(|has_open| !*has_open)
            .map_err(tracerr::wrap!())
    }
}
