//! [`ReturnRecord`]-related [`Database`] implementations.

use std::ops::RangeInclusive;

use common::{
    operations::{By, Insert, Select},
    Money,
};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{rental, return_record, ReturnRecord},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Columns of the `returns` table, in the order of [`from_row()`].
const COLUMNS: &str = "\
    id, rental_id, returned_at, condition, \
    damage_description, manager_comment, \
    deposit_withheld, deposit_returned, currency";

/// Reads a [`ReturnRecord`] out of the provided [`Row`].
fn from_row(row: &Row) -> ReturnRecord {
    let currency = row.get("currency");
    ReturnRecord {
        id: row.get("id"),
        rental_id: row.get("rental_id"),
        returned_at: row.get("returned_at"),
        condition: row.get("condition"),
        damage_description: row.get("damage_description"),
        manager_comment: row.get("manager_comment"),
        deposit_withheld: Money::new(row.get("deposit_withheld"), currency),
        deposit_returned: Money::new(row.get("deposit_returned"), currency),
    }
}

impl<C> Database<Select<By<Option<ReturnRecord>, rental::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<ReturnRecord>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<ReturnRecord>, rental::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let rental_id = by.into_inner();

        let sql =
            format!("SELECT {COLUMNS} FROM returns WHERE rental_id = $1::UUID");
        self.query_opt(&sql, &[&rental_id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(from_row))
    }
}

impl<C> Database<Select<By<Vec<ReturnRecord>, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<ReturnRecord>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<ReturnRecord>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        let sql = format!(
            "SELECT {COLUMNS} FROM returns ORDER BY returned_at DESC, id",
        );
        self.query(&sql, &[])
            .await
            .map_err(tracerr::wrap!())
            .map(|rows| rows.iter().map(from_row).collect())
    }
}

impl<C>
    Database<
        Select<
            By<Vec<ReturnRecord>, RangeInclusive<return_record::ReturnDateTime>>,
        >,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<ReturnRecord>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<ReturnRecord>, RangeInclusive<return_record::ReturnDateTime>>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let (start, end) = by.into_inner().into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM returns \
             WHERE returned_at BETWEEN $1::TIMESTAMPTZ AND $2::TIMESTAMPTZ",
        );
        self.query(&sql, &[&start, &end])
            .await
            .map_err(tracerr::wrap!())
            .map(|rows| rows.iter().map(from_row).collect())
    }
}

impl<C> Database<Insert<ReturnRecord>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(record): Insert<ReturnRecord>,
    ) -> Result<Self::Ok, Self::Err> {
        let ReturnRecord {
            id,
            rental_id,
            returned_at,
            condition,
            damage_description,
            manager_comment,
            deposit_withheld,
            deposit_returned,
        } = record;

        const SQL: &str = "\
            INSERT INTO returns (\
                id, rental_id, returned_at, condition, \
                damage_description, manager_comment, \
                deposit_withheld, deposit_returned, currency\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::TIMESTAMPTZ, $4::INT2, \
                $5::TEXT, $6::TEXT, \
                $7::NUMERIC, $8::NUMERIC, $9::INT2\
            )";
        self.exec(
            SQL,
            &[
                &id,
                &rental_id,
                &returned_at,
                &condition,
                &damage_description,
                &manager_comment,
                &deposit_withheld.amount,
                &deposit_returned.amount,
                &deposit_withheld.currency,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}
