//! [`Client`]-related [`Database`] implementations.

use std::ops::RangeInclusive;

use common::{
    operations::{By, Delete, Insert, Lock, Select, Update},
    DateTime,
};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{client, person, Client},
    infra::{
        database::{
            self,
            postgres::{Connection, LikePattern},
            Postgres,
        },
        Database,
    },
    read,
};

/// Columns of the `clients` table, in the order of [`from_row()`].
const COLUMNS: &str = "\
    id, last_name, first_name, middle_name, \
    phone, email, \
    registered_at, deleted_at";

/// Reads a [`Client`] out of the provided [`Row`].
fn from_row(row: &Row) -> Client {
    Client {
        id: row.get("id"),
        name: person::FullName {
            last: row.get("last_name"),
            first: row.get("first_name"),
            middle: row.get("middle_name"),
        },
        phone: row.get("phone"),
        email: row.get("email"),
        registered_at: row.get("registered_at"),
        deleted_at: row.get("deleted_at"),
    }
}

impl<C> Database<Select<By<Option<Client>, client::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Client>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Client>, client::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM clients \
             WHERE id = $1::UUID \
               AND deleted_at IS NULL",
        );
        self.query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(from_row))
    }
}

impl<C> Database<Select<By<Vec<Client>, read::client::list::Filter>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Client>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Client>, read::client::list::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::client::list::Filter { search } = by.into_inner();
        let pattern =
            search.as_ref().map(|s| LikePattern::containing(s.as_ref()));

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM clients \
             WHERE deleted_at IS NULL \
               AND ($1::VARCHAR IS NULL \
                    OR CONCAT_WS(' ', last_name, first_name, middle_name) \
                       ILIKE $1::VARCHAR \
                    OR phone ILIKE $1::VARCHAR) \
             ORDER BY last_name, first_name, middle_name NULLS FIRST, id",
        );
        self.query(&sql, &[&pattern])
            .await
            .map_err(tracerr::wrap!())
            .map(|rows| rows.iter().map(from_row).collect())
    }
}

impl<C>
    Database<
        Select<By<Vec<Client>, RangeInclusive<client::RegistrationDateTime>>>,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Client>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<Client>, RangeInclusive<client::RegistrationDateTime>>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let (start, end) = by.into_inner().into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM clients \
             WHERE registered_at BETWEEN $1::TIMESTAMPTZ AND $2::TIMESTAMPTZ",
        );
        self.query(&sql, &[&start, &end])
            .await
            .map_err(tracerr::wrap!())
            .map(|rows| rows.iter().map(from_row).collect())
    }
}

impl<C> Database<Insert<Client>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(client): Insert<Client>,
    ) -> Result<Self::Ok, Self::Err> {
        let Client {
            id,
            name,
            phone,
            email,
            registered_at,
            deleted_at,
        } = client;

        const SQL: &str = "\
            INSERT INTO clients (\
                id, last_name, first_name, middle_name, \
                phone, email, \
                registered_at, deleted_at\
            ) \
            VALUES (\
                $1::UUID, $2::VARCHAR, $3::VARCHAR, $4::VARCHAR, \
                $5::VARCHAR, $6::VARCHAR, \
                $7::TIMESTAMPTZ, $8::TIMESTAMPTZ\
            )";
        self.exec(
            SQL,
            &[
                &id,
                &name.last,
                &name.first,
                &name.middle,
                &phone,
                &email,
                &registered_at,
                &deleted_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Update<Client>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(client): Update<Client>,
    ) -> Result<Self::Ok, Self::Err> {
        let Client {
            id,
            name,
            phone,
            email,
            ..
        } = client;

        const SQL: &str = "\
            UPDATE clients \
            SET last_name = $2::VARCHAR, \
                first_name = $3::VARCHAR, \
                middle_name = $4::VARCHAR, \
                phone = $5::VARCHAR, \
                email = $6::VARCHAR \
            WHERE id = $1::UUID \
              AND deleted_at IS NULL";
        self.exec(
            SQL,
            &[&id, &name.last, &name.first, &name.middle, &phone, &email],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Client, client::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Client, client::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        let deleted_at: client::DeletionDateTime = DateTime::now().coerce();

        const SQL: &str = "\
            UPDATE clients \
            SET deleted_at = $2::TIMESTAMPTZ \
            WHERE id = $1::UUID \
              AND deleted_at IS NULL";
        self.exec(SQL, &[&id, &deleted_at])
            .await
            .map_err(tracerr::wrap!())
            .map(|affected| affected == 1)
    }
}

impl<C> Database<Lock<By<Client, client::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Client, client::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        // Upsert locks the row even if it exists already.
        const SQL: &str = "\
            INSERT INTO clients_lock (id) \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO UPDATE SET id = EXCLUDED.id";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
