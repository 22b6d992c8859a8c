//! [`Query`] collection related to a single [`Equipment`].

use common::operations::{By, Select};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Rental;
use crate::{
    domain::{equipment, Equipment},
    infra::{database, Database},
    read, Query, Service,
};

use super::DatabaseQuery;

/// Queries a non-deleted [`Equipment`] by its [`equipment::Id`].
pub type ById = DatabaseQuery<By<Option<Equipment>, equipment::Id>>;

/// Queries whether an [`Equipment`] may be deleted, i.e. no open [`Rental`]
/// refers to it.
#[derive(Clone, Copy, Debug)]
pub struct CanDelete(pub equipment::Id);

impl<Db> Query<CanDelete> for Service<Db>
where
    Db: Database<
        Select<By<read::rental::HasOpen, equipment::Id>>,
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
