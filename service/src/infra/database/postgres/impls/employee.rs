//! [`Employee`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{employee, person, Employee},
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

/// Columns of the `employees` table, in the order of [`from_row()`].
const COLUMNS: &str = "\
    id, last_name, first_name, middle_name, \
    position, phone, email, password_hash, \
    created_at";

/// Reads an [`Employee`] out of the provided [`Row`].
fn from_row(row: &Row) -> Employee {
    Employee {
        id: row.get("id"),
        name: person::FullName {
            last: row.get("last_name"),
            first: row.get("first_name"),
            middle: row.get("middle_name"),
        },
        position: row.get("position"),
        phone: row.get("phone"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Option<Employee>, employee::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Employee>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Employee>, employee::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let sql =
            format!("SELECT {COLUMNS} FROM employees WHERE id = $1::UUID");
        self.query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(from_row))
    }
}

impl<'e, C> Database<Select<By<Option<Employee>, &'e person::Email>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Employee>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Employee>, &'e person::Email>>,
    ) -> Result<Self::Ok, Self::Err> {
        let email = by.into_inner();

        let sql =
            format!("SELECT {COLUMNS} FROM employees WHERE email = $1::VARCHAR");
        self.query_opt(&sql, &[email])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(from_row))
    }
}

impl<C> Database<Select<By<Vec<Employee>, read::employee::list::Filter>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Employee>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Employee>, read::employee::list::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::employee::list::Filter { position, search } =
            by.into_inner();
        let pattern =
            search.as_ref().map(|s| LikePattern::containing(s.as_ref()));

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM employees \
             WHERE ($1::INT2 IS NULL OR position = $1::INT2) \
               AND ($2::VARCHAR IS NULL \
                    OR CONCAT_WS(' ', last_name, first_name, middle_name) \
                       ILIKE $2::VARCHAR \
                    OR phone ILIKE $2::VARCHAR \
                    OR email ILIKE $2::VARCHAR) \
             ORDER BY last_name, first_name, middle_name NULLS FIRST, id",
        );
        self.query(&sql, &[&position, &pattern])
            .await
            .map_err(tracerr::wrap!())
            .map(|rows| rows.iter().map(from_row).collect())
    }
}

impl<C> Database<Insert<Employee>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Employee>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(employee): Insert<Employee>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(employee))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Employee>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(employee): Update<Employee>,
    ) -> Result<Self::Ok, Self::Err> {
        let Employee {
            id,
            name,
            position,
            phone,
            email,
            password_hash,
            created_at,
        } = employee;

        const SQL: &str = "\
            INSERT INTO employees (\
                id, last_name, first_name, middle_name, \
                position, phone, email, password_hash, \
                created_at\
            ) \
            VALUES (\
                $1::UUID, $2::VARCHAR, $3::VARCHAR, $4::VARCHAR, \
                $5::INT2, $6::VARCHAR, $7::VARCHAR, $8::VARCHAR, \
                $9::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET last_name = EXCLUDED.last_name, \
                first_name = EXCLUDED.first_name, \
                middle_name = EXCLUDED.middle_name, \
                position = EXCLUDED.position, \
                phone = EXCLUDED.phone, \
                email = EXCLUDED.email, \
                password_hash = EXCLUDED.password_hash";
        self.exec(
            SQL,
            &[
                &id,
                &name.last,
                &name.first,
                &name.middle,
                &position,
                &phone,
                &email,
                &password_hash,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}
