//! [`Query`] for reporting figures of a period.

use std::ops::RangeInclusive;

use common::{
    operations::{By, Select},
    Currency, DateTime, Money,
};
use derive_more::{Display, Error, From};
use itertools::Itertools as _;
use rust_decimal::Decimal;
use tracerr::Traced;

use crate::{
    domain::{
        client, equipment, rental, return_record, Client, Rental,
        ReturnRecord,
    },
    infra::{database, Database},
    Query, Service,
};

/// Maximum number of rows in [`Output::top_clients`] and
/// [`Output::top_equipment`].
pub const TOP_SIZE: usize = 5;

/// [`Query`] calculating figures of the inclusive period.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Period {
    /// Start of the period.
    pub start: DateTime,

    /// End of the period.
    pub end: DateTime,

    /// [`Currency`] to sum [`Rental`] costs in.
    ///
    /// [`Rental`]s charged in other [`Currency`]s are not included into the
    /// revenue.
    pub currency: Currency,
}

/// Output of the [`Period`] [`Query`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Output {
    /// Sum of [`Rental`] total costs.
    pub revenue: Money,

    /// Number of [`Rental`]s opened in the period.
    pub rentals: usize,

    /// Revenue per a single [`Rental`] charged in the requested
    /// [`Currency`].
    pub average_check: Money,

    /// Number of [`Client`]s registered in the period.
    pub new_clients: usize,

    /// Number of [`ReturnRecord`]s made in the period.
    pub returns: usize,

    /// [`Client`]s who spent the most, in descending order.
    pub top_clients: Vec<ClientRow>,

    /// Most rented [`Equipment`], in descending order.
    ///
    /// [`Equipment`]: crate::domain::Equipment
    pub top_equipment: Vec<EquipmentRow>,
}

/// Row of [`Output::top_clients`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ClientRow {
    /// ID of the [`Client`].
    pub client_id: client::Id,

    /// Sum of the [`Client`]'s [`Rental`] total costs.
    pub spent: Money,
}

/// Row of [`Output::top_equipment`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EquipmentRow {
    /// ID of the [`Equipment`].
    ///
    /// [`Equipment`]: crate::domain::Equipment
    pub equipment_id: equipment::Id,

    /// Number of [`Rental`]s of the [`Equipment`].
    ///
    /// [`Equipment`]: crate::domain::Equipment
    pub rentals: usize,
}

impl<Db> Query<Period> for Service<Db>
where
    Db: Database<
            Select<By<Vec<Rental>, RangeInclusive<rental::CreationDateTime>>>,
            Ok = Vec<Rental>,
            Err = Traced<database::Error>,
        > + Database<
            Select<
                By<Vec<Client>, RangeInclusive<client::RegistrationDateTime>>,
            >,
            Ok = Vec<Client>,
            Err = Traced<database::Error>,
        > + Database<
            Select<
                By<
                    Vec<ReturnRecord>,
                    RangeInclusive<return_record::ReturnDateTime>,
                >,
            >,
            Ok = Vec<ReturnRecord>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        Period {
            start,
            end,
            currency,
        }: Period,
    ) -> Result<Self::Ok, Self::Err> {
        let rentals = self
            .database()
            .execute(Select(By::<Vec<Rental>, _>::new(RangeInclusive::new(
                start.coerce(),
                end.coerce(),
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> ExecutionError))?;
        let new_clients = self
            .database()
            .execute(Select(By::<Vec<Client>, _>::new(RangeInclusive::new(
                start.coerce(),
                end.coerce(),
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> ExecutionError))?
            .len();
        let returns = self
            .database()
            .execute(Select(By::<Vec<ReturnRecord>, _>::new(
                RangeInclusive::new(start.coerce(), end.coerce()),
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> ExecutionError))?
            .len();

        let charged = rentals
            .iter()
            .filter(|r| r.total_cost.currency == currency)
            .collect::<Vec<_>>();

        let revenue = charged
            .iter()
            .try_fold(Decimal::ZERO, |sum, r| {
                sum.checked_add(r.total_cost.amount)
            })
            .ok_or(ExecutionError::Overflow)
            .map_err(tracerr::wrap!())?;
        let average_check = if charged.is_empty() {
            Decimal::ZERO
        } else {
            revenue / Decimal::from(charged.len())
        };

        let top_clients = charged
            .iter()
            .into_grouping_map_by(|r| r.client_id)
            .fold(Some(Decimal::ZERO), |sum, _, r| {
                sum?.checked_add(r.total_cost.amount)
            })
            .into_iter()
            .map(|(id, spent)| spent.map(|s| (id, s)))
            .collect::<Option<Vec<_>>>()
            .ok_or(ExecutionError::Overflow)
            .map_err(tracerr::wrap!())?
            .into_iter()
            .sorted_by(|(a_id, a), (b_id, b)| b.cmp(a).then(a_id.cmp(b_id)))
            .take(TOP_SIZE)
            .map(|(client_id, spent)| ClientRow {
                client_id,
                spent: Money::new(spent, currency).round(),
            })
            .collect();

        let top_equipment = rentals
            .iter()
            .counts_by(|r| r.equipment_id)
            .into_iter()
            .sorted_by(|(a_id, a), (b_id, b)| b.cmp(a).then(a_id.cmp(b_id)))
            .take(TOP_SIZE)
            .map(|(equipment_id, rentals)| EquipmentRow {
                equipment_id,
                rentals,
            })
            .collect();

        Ok(Output {
            revenue: Money::new(revenue, currency).round(),
            rentals: rentals.len(),
            average_check: Money::new(average_check, currency).round(),
            new_clients,
            returns,
            top_clients,
            top_equipment,
        })
    }
}

/// Error of [`Period`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Sum of the [`Rental`] costs is too large to be represented.
    #[display("Revenue of the period overflows")]
    Overflow,
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::{Currency, DateTime, Money};

    use crate::{
        command::{OpenRental, ProcessReturn},
        domain::{rental, return_record, Client, Equipment},
        fixture,
        infra::Memory,
        Command as _, Query as _, Service,
    };

    use super::{ClientRow, ExecutionError, Period};

    async fn rent(
        svc: &Service<Memory>,
        client: &Client,
        equipment: &Equipment,
        days: u32,
    ) -> rental::Id {
        let employee =
            fixture::employee(svc, &format!("{}@shop.ru", rental::Id::new()))
                .await;
        svc.execute(OpenRental {
            client_id: client.id,
            equipment_id: equipment.id,
            employee_id: employee.id,
            unit: rental::Unit::Day,
            period: days,
            planned_return_at: fixture::tomorrow(),
            payment_status: rental::PaymentStatus::Paid,
            notes: None,
        })
        .await
        .unwrap()
        .id
    }

    fn around_now() -> Period {
        let hour = Duration::from_secs(60 * 60);
        Period {
            start: DateTime::now() - hour,
            end: DateTime::now() + hour,
            currency: Currency::Rub,
        }
    }

    #[tokio::test]
    async fn sums_period_figures() {
        let svc = fixture::service();
        let rich = fixture::client(&svc).await;
        let modest = fixture::client(&svc).await;
        let drill = fixture::equipment(&svc, "100", None, "0").await;
        let saw = fixture::equipment(&svc, "50", None, "0").await;

        let first = rent(&svc, &rich, &drill, 3).await;
        svc.execute(ProcessReturn {
            rental_id: first,
            condition: return_record::Condition::Excellent,
            damage_description: None,
            manager_comment: None,
        })
        .await
        .unwrap();
        rent(&svc, &rich, &drill, 1).await;
        rent(&svc, &modest, &saw, 1).await;

        let out = svc.execute(around_now()).await.unwrap();

        assert_eq!(out.revenue, fixture::rub("450.00"));
        assert_eq!(out.rentals, 3);
        assert_eq!(out.average_check, fixture::rub("150.00"));
        assert_eq!(out.new_clients, 2);
        assert_eq!(out.returns, 1);
        assert_eq!(
            out.top_clients,
            [
                ClientRow {
                    client_id: rich.id,
                    spent: fixture::rub("400.00"),
                },
                ClientRow {
                    client_id: modest.id,
                    spent: fixture::rub("50.00"),
                },
            ],
        );
        assert_eq!(out.top_equipment[0].equipment_id, drill.id);
        assert_eq!(out.top_equipment[0].rentals, 2);
        assert_eq!(out.top_equipment[1].rentals, 1);
    }

    #[tokio::test]
    async fn reports_empty_period() {
        let svc = fixture::service();
        let client = fixture::client(&svc).await;
        let eq = fixture::equipment(&svc, "100", None, "0").await;
        rent(&svc, &client, &eq, 1).await;

        let out = svc
            .execute(Period {
                currency: Currency::Usd,
                ..around_now()
            })
            .await
            .unwrap();
        assert_eq!(out.revenue, Money::zero(Currency::Usd));
        assert_eq!(out.average_check, Money::zero(Currency::Usd));
        assert_eq!(out.rentals, 1);
        assert!(out.top_clients.is_empty());

        let day = Duration::from_secs(24 * 60 * 60);
        let out = svc
            .execute(Period {
                start: DateTime::now() - day - day,
                end: DateTime::now() - day,
                currency: Currency::Rub,
            })
            .await
            .unwrap();
        assert_eq!(out.rentals, 0);
        assert_eq!(out.new_clients, 0);
        assert!(out.top_equipment.is_empty());
    }

    #[tokio::test]
    async fn reports_overflowing_revenue() {
        let svc = fixture::service();
        let client = fixture::client(&svc).await;
        for _ in 0..2 {
            let eq = fixture::equipment(
                &svc,
                "70000000000000000000000000000",
                None,
                "0",
            )
            .await;
            rent(&svc, &client, &eq, 1).await;
        }

        let err = svc.execute(around_now()).await.unwrap_err();

        assert!(matches!(err.into_inner(), ExecutionError::Overflow));
    }
}
