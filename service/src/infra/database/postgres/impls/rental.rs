//! [`Rental`]-related [`Database`] implementations.

use std::ops::RangeInclusive;

use common::{
    operations::{By, Insert, Select},
    DateTime, Money,
};
use tokio_postgres::Row;
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::ReturnRecord;
use crate::{
    domain::{client, equipment, rental, Rental},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

/// Columns of the `rentals` table, in the order of [`from_row()`].
const COLUMNS: &str = "\
    r.id, r.client_id, r.equipment_id, r.employee_id, \
    r.created_at, r.planned_return_at, r.unit, r.period, \
    r.total_cost, r.deposit, r.currency, \
    r.payment_status, r.notes";

/// Reads a [`Rental`] out of the provided [`Row`].
fn from_row(row: &Row) -> Rental {
    let currency = row.get("currency");
    Rental {
        id: row.get("id"),
        client_id: row.get("client_id"),
        equipment_id: row.get("equipment_id"),
        employee_id: row.get("employee_id"),
        created_at: row.get("created_at"),
        planned_return_at: row.get("planned_return_at"),
        unit: row.get("unit"),
        period: row.get("period"),
        total_cost: Money::new(row.get("total_cost"), currency),
        deposit: Money::new(row.get("deposit"), currency),
        payment_status: row.get("payment_status"),
        notes: row.get("notes"),
    }
}

impl<C> Database<Select<By<Option<Rental>, rental::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Rental>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Rental>, rental::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let sql =
            format!("SELECT {COLUMNS} FROM rentals r WHERE r.id = $1::UUID");
        self.query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(from_row))
    }
}

impl<C> Database<Select<By<Vec<Rental>, read::rental::list::Filter>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Rental>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Rental>, read::rental::list::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::rental::list::Filter {
            open,
            client_id,
            equipment_id,
        } = by.into_inner();
        let now = DateTime::now();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM rentals r \
             LEFT JOIN returns t ON t.rental_id = r.id \
             WHERE ($1::BOOL IS NULL \
                    OR (r.created_at <= $2::TIMESTAMPTZ \
                        AND t.id IS NULL) = $1::BOOL) \
               AND ($3::UUID IS NULL OR r.client_id = $3::UUID) \
               AND ($4::UUID IS NULL OR r.equipment_id = $4::UUID) \
             ORDER BY r.created_at DESC, r.id",
        );
        self.query(&sql, &[&open, &now, &client_id, &equipment_id])
            .await
            .map_err(tracerr::wrap!())
            .map(|rows| rows.iter().map(from_row).collect())
    }
}

impl<C>
    Database<Select<By<Vec<Rental>, RangeInclusive<rental::CreationDateTime>>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Rental>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<Rental>, RangeInclusive<rental::CreationDateTime>>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let (start, end) = by.into_inner().into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM rentals r \
             WHERE r.created_at BETWEEN $1::TIMESTAMPTZ AND $2::TIMESTAMPTZ",
        );
        self.query(&sql, &[&start, &end])
            .await
            .map_err(tracerr::wrap!())
            .map(|rows| rows.iter().map(from_row).collect())
    }
}

/// SQL checking whether an open [`Rental`] exists among the ones matching the
/// provided `condition`.
///
/// A [`Rental`] is open if it has started by `$2` and has no
/// [`ReturnRecord`].
fn has_open_sql(condition: &str) -> String {
    format!(
        "SELECT EXISTS (\
             SELECT 1 \
             FROM rentals r \
             WHERE {condition} \
               AND r.created_at <= $2::TIMESTAMPTZ \
               AND NOT EXISTS (\
                   SELECT 1 FROM returns t WHERE t.rental_id = r.id\
               )\
         )",
    )
}

impl<C> Database<Select<By<read::rental::HasOpen, equipment::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::rental::HasOpen;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::rental::HasOpen, equipment::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        let now = DateTime::now();

        let sql = has_open_sql("r.equipment_id = $1::UUID");
        self.query(&sql, &[&id, &now])
            .await
            .map_err(tracerr::wrap!())
            .map(|rows| {
                read::rental::HasOpen(rows.first().is_some_and(|r| r.get(0)))
            })
    }
}

impl<C> Database<Select<By<read::rental::HasOpen, client::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = read::rental::HasOpen;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::rental::HasOpen, client::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        let now = DateTime::now();

        let sql = has_open_sql("r.client_id = $1::UUID");
        self.query(&sql, &[&id, &now])
            .await
            .map_err(tracerr::wrap!())
            .map(|rows| {
                read::rental::HasOpen(rows.first().is_some_and(|r| r.get(0)))
            })
    }
}

impl<C> Database<Insert<Rental>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(rental): Insert<Rental>,
    ) -> Result<Self::Ok, Self::Err> {
        let Rental {
            id,
            client_id,
            equipment_id,
            employee_id,
            created_at,
            planned_return_at,
            unit,
            period,
            total_cost,
            deposit,
            payment_status,
            notes,
        } = rental;

        const SQL: &str = "\
            INSERT INTO rentals (\
                id, client_id, equipment_id, employee_id, \
                created_at, planned_return_at, unit, period, \
                total_cost, deposit, currency, \
                payment_status, notes\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::UUID, $4::UUID, \
                $5::TIMESTAMPTZ, $6::TIMESTAMPTZ, $7::INT2, $8::INT4, \
                $9::NUMERIC, $10::NUMERIC, $11::INT2, \
                $12::INT2, $13::TEXT\
            )";
        self.exec(
            SQL,
            &[
                &id,
                &client_id,
                &equipment_id,
                &employee_id,
                &created_at,
                &planned_return_at,
                &unit,
                &period,
                &total_cost.amount,
                &deposit.amount,
                &total_cost.currency,
                &payment_status,
                &notes,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}
