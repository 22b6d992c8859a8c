//! [`Equipment`]-related [`Database`] implementations.

use common::{
    operations::{By, Delete, Insert, Select, Update},
    DateTime, Money,
};
use itertools::Itertools as _;
use postgres_types::ToSql;
use rust_decimal::Decimal;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{equipment, Equipment},
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

/// Columns of the `equipment` table, in the order of [`from_row()`].
const COLUMNS: &str = "\
    id, name, category_id, status, \
    serial_number, description, notes, \
    daily_rate, hourly_rate, deposit, currency, \
    created_at, deleted_at";

/// Reads an [`Equipment`] out of the provided [`Row`].
fn from_row(row: &Row) -> Equipment {
    let currency = row.get("currency");
    let money = |amount: Decimal| Money::new(amount, currency);

    // SAFETY: Only valid `equipment::Rates` are ever stored.
    #[expect(unsafe_code, reason = "invariants are preserved")]
    let rates = unsafe {
        equipment::Rates::new_unchecked(
            money(row.get("daily_rate")),
            row.get::<_, Option<_>>("hourly_rate").map(money),
            money(row.get("deposit")),
        )
    };

    Equipment {
        id: row.get("id"),
        name: row.get("name"),
        category_id: row.get("category_id"),
        status: row.get("status"),
        serial_number: row.get("serial_number"),
        description: row.get("description"),
        notes: row.get("notes"),
        rates,
        created_at: row.get("created_at"),
        deleted_at: row.get("deleted_at"),
    }
}

impl<C> Database<Select<By<Option<Equipment>, equipment::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Equipment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Equipment>, equipment::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM equipment \
             WHERE id = $1::UUID \
               AND deleted_at IS NULL",
        );
        self.query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(from_row))
    }
}

impl<C> Database<Select<By<Vec<Equipment>, read::equipment::list::Filter>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Equipment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Equipment>, read::equipment::list::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::equipment::list::Filter {
            name,
            category_id,
            status,
        } = by.into_inner();

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![];

        let name_pattern =
            name.as_ref().map(|n| LikePattern::containing(n.as_ref()));
        let name_idx = name_pattern.as_ref().map(|p| {
            ps.push(p);
            ps.len()
        });
        let category_idx = category_id.as_ref().map(|id| {
            ps.push(id);
            ps.len()
        });
        let status_idx = status.as_ref().map(|s| {
            ps.push(s);
            ps.len()
        });

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM equipment \
             WHERE deleted_at IS NULL \
                   {name_filtering} \
                   {category_filtering} \
                   {status_filtering} \
             ORDER BY name, id",
            name_filtering = name_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!("AND name ILIKE ${idx}::VARCHAR"))
            }),
            category_filtering =
                category_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND category_id = ${idx}::UUID"))
                }),
            status_filtering =
                status_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND status = ${idx}::INT2"))
                }),
        );
        self.query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())
            .map(|rows| rows.iter().map(from_row).collect())
    }
}

impl<C> Database<Insert<Equipment>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(equipment): Insert<Equipment>,
    ) -> Result<Self::Ok, Self::Err> {
        let Equipment {
            id,
            name,
            category_id,
            status,
            serial_number,
            description,
            notes,
            rates,
            created_at,
            deleted_at,
        } = equipment;

        const SQL: &str = "\
            INSERT INTO equipment (\
                id, name, category_id, status, \
                serial_number, description, notes, \
                daily_rate, hourly_rate, deposit, currency, \
                created_at, deleted_at\
            ) \
            VALUES (\
                $1::UUID, $2::VARCHAR, $3::UUID, $4::INT2, \
                $5::VARCHAR, $6::TEXT, $7::TEXT, \
                $8::NUMERIC, $9::NUMERIC, $10::NUMERIC, $11::INT2, \
                $12::TIMESTAMPTZ, $13::TIMESTAMPTZ\
            )";
        self.exec(
            SQL,
            &[
                &id,
                &name,
                &category_id,
                &status,
                &serial_number,
                &description,
                &notes,
                &rates.daily().amount,
                &rates.hourly().map(|m| m.amount),
                &rates.deposit().amount,
                &rates.currency(),
                &created_at,
                &deleted_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Update<Equipment>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(equipment): Update<Equipment>,
    ) -> Result<Self::Ok, Self::Err> {
        let Equipment {
            id,
            name,
            category_id,
            serial_number,
            description,
            notes,
            rates,
            ..
        } = equipment;

        // `status` is changed by `equipment::StatusChange` only.
        const SQL: &str = "\
            UPDATE equipment \
            SET name = $2::VARCHAR, \
                category_id = $3::UUID, \
                serial_number = $4::VARCHAR, \
                description = $5::TEXT, \
                notes = $6::TEXT, \
                daily_rate = $7::NUMERIC, \
                hourly_rate = $8::NUMERIC, \
                deposit = $9::NUMERIC, \
                currency = $10::INT2 \
            WHERE id = $1::UUID";
        self.exec(
            SQL,
            &[
                &id,
                &name,
                &category_id,
                &serial_number,
                &description,
                &notes,
                &rates.daily().amount,
                &rates.hourly().map(|m| m.amount),
                &rates.deposit().amount,
                &rates.currency(),
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Update<equipment::StatusChange>> for Postgres<C>
where
    C: Connection,
{
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(change): Update<equipment::StatusChange>,
    ) -> Result<Self::Ok, Self::Err> {
        let equipment::StatusChange { id, from, to } = change;

        const SQL: &str = "\
            UPDATE equipment \
            SET status = $3::INT2 \
            WHERE id = $1::UUID \
              AND status = $2::INT2 \
              AND deleted_at IS NULL";
        self.exec(SQL, &[&id, &from, &to])
            .await
            .map_err(tracerr::wrap!())
            .map(|affected| affected == 1)
    }
}

impl<C> Database<Delete<By<Equipment, equipment::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Equipment, equipment::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        let deleted_at: equipment::DeletionDateTime = DateTime::now().coerce();

        const SQL: &str = "\
            UPDATE equipment \
            SET deleted_at = $2::TIMESTAMPTZ \
            WHERE id = $1::UUID \
              AND status = $3::INT2 \
              AND deleted_at IS NULL";
        self.exec(
            SQL,
            &[&id, &deleted_at, &equipment::Status::Available],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(|affected| affected == 1)
    }
}
