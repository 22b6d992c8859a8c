//! [`Category`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{category, Category},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Reads a [`Category`] out of the provided [`Row`].
fn from_row(row: &Row) -> Category {
    Category {
        id: row.get("id"),
        name: row.get("name"),
    }
}

impl<C> Database<Select<By<Option<Category>, category::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Category>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Category>, category::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            SELECT id, name \
            FROM categories \
            WHERE id = $1::UUID";
        self.query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(from_row))
    }
}

impl<C> Database<Select<By<Vec<Category>, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Category>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Category>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT id, name \
            FROM categories \
            ORDER BY name, id";
        self.query(SQL, &[])
            .await
            .map_err(tracerr::wrap!())
            .map(|rows| rows.iter().map(from_row).collect())
    }
}

impl<C> Database<Insert<Category>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(category): Insert<Category>,
    ) -> Result<Self::Ok, Self::Err> {
        let Category { id, name } = category;

        const SQL: &str = "\
            INSERT INTO categories (id, name) \
            VALUES ($1::UUID, $2::VARCHAR)";
        self.exec(SQL, &[&id, &name])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
