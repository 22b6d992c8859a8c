//! [`Command`] for opening a new [`Rental`].

use common::{
    operations::{
        By, Commit, Insert, Lock, Select, Transact, Transacted, Update,
    },
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        client, employee, equipment, rental, Client, Employee, Equipment,
        Rental,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for opening a new [`Rental`].
#[derive(Clone, Debug)]
pub struct OpenRental {
    /// ID of the [`Client`] renting the [`Equipment`].
    pub client_id: client::Id,

    /// ID of the [`Equipment`] to rent.
    pub equipment_id: equipment::Id,

    /// ID of the [`Employee`] issuing the [`Rental`].
    pub employee_id: employee::Id,

    /// [`rental::Unit`] the `period` is measured in.
    pub unit: rental::Unit,

    /// Number of [`rental::Unit`]s to rent the [`Equipment`] for.
    pub period: u32,

    /// [`DateTime`] when the [`Equipment`] is expected to be returned.
    pub planned_return_at: rental::PlannedReturnDateTime,

    /// [`rental::PaymentStatus`] of a new [`Rental`].
    pub payment_status: rental::PaymentStatus,

    /// [`rental::Notes`] of a new [`Rental`].
    pub notes: Option<rental::Notes>,
}

impl<Db> Command<OpenRental> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Client, client::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Client>, client::Id>>,
            Ok = Option<Client>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Employee>, employee::Id>>,
            Ok = Option<Employee>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Equipment>, equipment::Id>>,
            Ok = Option<Equipment>,
            Err = Traced<database::Error>,
        > + Database<
            Update<equipment::StatusChange>,
            Ok = bool,
            Err = Traced<database::Error>,
        > + Database<Insert<Rental>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Rental;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: OpenRental) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let OpenRental {
            client_id,
            equipment_id,
            employee_id,
            unit,
            period,
            planned_return_at,
            payment_status,
            notes,
        } = cmd;

        let period = rental::Period::new(period)
            .ok_or(E::InvalidPeriod)
            .map_err(tracerr::wrap!())?;
        let created_at: rental::CreationDateTime = DateTime::now().coerce();
        if !created_at.is_before(&planned_return_at) {
            return Err(tracerr::new!(E::InvalidPlannedReturn));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid the `Client` being deleted concurrently.
        tx.execute(Lock(By::new(client_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let client = tx
            .execute(Select(By::<Option<Client>, _>::new(client_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ClientNotExists(client_id))
            .map_err(tracerr::wrap!())?;
        let employee = tx
            .execute(Select(By::<Option<Employee>, _>::new(employee_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::EmployeeNotExists(employee_id))
            .map_err(tracerr::wrap!())?;
        let equipment = tx
            .execute(Select(By::<Option<Equipment>, _>::new(equipment_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::EquipmentNotExists(equipment_id))
            .map_err(tracerr::wrap!())?;

        let charge = rental::Charge::calculate(&equipment.rates, unit, period)
            .map_err(|e| match e {
                equipment::CostError::MissingHourlyRate => {
                    E::MissingRate(equipment.id)
                }
                equipment::CostError::Overflow => E::CostOverflow(equipment.id),
            })
            .map_err(tracerr::wrap!())?;

        // Stored status is re-checked by the update itself, so a concurrent
        // `OpenRental` can't rent the same `Equipment` twice.
        let rented = tx
            .execute(Update(equipment::StatusChange::rent(equipment.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if !rented {
            return Err(tracerr::new!(E::EquipmentUnavailable(equipment.id)));
        }

        let rental = Rental {
            id: rental::Id::new(),
            client_id: client.id,
            equipment_id: equipment.id,
            employee_id: employee.id,
            created_at,
            planned_return_at,
            unit,
            period,
            total_cost: charge.total,
            deposit: charge.deposit,
            payment_status,
            notes,
        };
        tx.execute(Insert(rental.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tracing::info!(
            rental.id = %rental.id,
            equipment.id = %rental.equipment_id,
            client.id = %rental.client_id,
            total_cost = %rental.total_cost,
            "rental opened",
        );

        Ok(rental)
    }
}

/// Error of [`OpenRental`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Rental period is not positive.
    #[display("Rental period must be positive")]
    InvalidPeriod,

    /// Planned return doesn't lie after the opening.
    #[display("Planned return must lie in the future")]
    InvalidPlannedReturn,

    /// [`Client`] with the provided ID does not exist.
    #[display("`Client(id: {_0})` does not exist")]
    ClientNotExists(#[error(not(source))] client::Id),

    /// [`Employee`] with the provided ID does not exist.
    #[display("`Employee(id: {_0})` does not exist")]
    EmployeeNotExists(#[error(not(source))] employee::Id),

    /// [`Equipment`] with the provided ID does not exist.
    #[display("`Equipment(id: {_0})` does not exist")]
    EquipmentNotExists(#[error(not(source))] equipment::Id),

    /// [`Equipment`] has no hourly rate.
    #[display("`Equipment(id: {_0})` has no hourly rate")]
    MissingRate(#[error(not(source))] equipment::Id),

    /// Cost of renting the [`Equipment`] is too large to be represented.
    #[display("Cost of renting `Equipment(id: {_0})` overflows")]
    CostOverflow(#[error(not(source))] equipment::Id),

    /// [`Equipment`] is not available for rent.
    #[display("`Equipment(id: {_0})` is not available")]
    EquipmentUnavailable(#[error(not(source))] equipment::Id),
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Select},
        DateTime,
    };

    use crate::{
        domain::{equipment, rental, Rental},
        fixture,
        read, Command as _,
    };

    use super::{ExecutionError as E, OpenRental};

    fn cmd(
        client: &crate::domain::Client,
        equipment: &crate::domain::Equipment,
        employee: &crate::domain::Employee,
        unit: rental::Unit,
        period: u32,
    ) -> OpenRental {
        OpenRental {
            client_id: client.id,
            equipment_id: equipment.id,
            employee_id: employee.id,
            unit,
            period,
            planned_return_at: fixture::tomorrow(),
            payment_status: rental::PaymentStatus::Paid,
            notes: None,
        }
    }

    async fn rentals(
        svc: &crate::Service<crate::infra::Memory>,
    ) -> Vec<Rental> {
        svc.database()
            .execute(Select(By::<Vec<Rental>, _>::new(
                read::rental::list::Filter::default(),
            )))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn charges_cost_and_deposit() {
        let svc = fixture::service();
        let eq = fixture::equipment(&svc, "100", None, "500").await;
        let client = fixture::client(&svc).await;
        let employee = fixture::employee(&svc, "a@shop.ru").await;

        let rental = svc
            .execute(cmd(&client, &eq, &employee, rental::Unit::Day, 3))
            .await
            .unwrap();

        assert_eq!(rental.total_cost, fixture::rub("800.00"));
        assert_eq!(rental.deposit, fixture::rub("500.00"));
        assert_eq!(rental.rental_cost(), fixture::rub("300.00"));
        assert_eq!(rental.total_cost.to_string(), "800.00RUB");
        assert_eq!(
            fixture::status_of(&svc, eq.id).await,
            equipment::Status::Rented,
        );
    }

    #[tokio::test]
    async fn fails_without_hourly_rate() {
        let svc = fixture::service();
        let eq = fixture::equipment(&svc, "100", None, "500").await;
        let client = fixture::client(&svc).await;
        let employee = fixture::employee(&svc, "a@shop.ru").await;

        let err = svc
            .execute(cmd(&client, &eq, &employee, rental::Unit::Hour, 2))
            .await
            .unwrap_err();

        assert!(matches!(err.into_inner(), E::MissingRate(id) if id == eq.id));
        assert!(rentals(&svc).await.is_empty());
        assert_eq!(
            fixture::status_of(&svc, eq.id).await,
            equipment::Status::Available,
        );
    }

    #[tokio::test]
    async fn reports_overflowing_cost() {
        let svc = fixture::service();
        let eq = fixture::equipment(
            &svc,
            "70000000000000000000000000000",
            None,
            "0",
        )
        .await;
        let client = fixture::client(&svc).await;
        let employee = fixture::employee(&svc, "a@shop.ru").await;

        let err = svc
            .execute(cmd(&client, &eq, &employee, rental::Unit::Day, 2))
            .await
            .unwrap_err();

        assert!(
            matches!(err.into_inner(), E::CostOverflow(id) if id == eq.id),
        );
        assert!(rentals(&svc).await.is_empty());
        assert_eq!(
            fixture::status_of(&svc, eq.id).await,
            equipment::Status::Available,
        );
    }

    #[tokio::test]
    async fn rents_only_once_concurrently() {
        let svc = fixture::service();
        let eq = fixture::equipment(&svc, "100", Some("10"), "500").await;
        let client = fixture::client(&svc).await;
        let employee = fixture::employee(&svc, "a@shop.ru").await;

        let (first, second) = tokio::join!(
            svc.execute(cmd(&client, &eq, &employee, rental::Unit::Day, 1)),
            svc.execute(cmd(&client, &eq, &employee, rental::Unit::Hour, 4)),
        );

        let failed = match (first, second) {
            (Ok(_), Err(e)) | (Err(e), Ok(_)) => e,
            (a, b) => panic!("exactly one must succeed: {a:?}, {b:?}"),
        };
        assert!(matches!(
            failed.into_inner(),
            E::EquipmentUnavailable(id) if id == eq.id,
        ));
        assert_eq!(rentals(&svc).await.len(), 1);
    }

    #[tokio::test]
    async fn refuses_rented_equipment() {
        let svc = fixture::service();
        let eq = fixture::equipment(&svc, "100", None, "0").await;
        let client = fixture::client(&svc).await;
        let employee = fixture::employee(&svc, "a@shop.ru").await;

        svc.execute(cmd(&client, &eq, &employee, rental::Unit::Day, 1))
            .await
            .unwrap();
        let err = svc
            .execute(cmd(&client, &eq, &employee, rental::Unit::Day, 1))
            .await
            .unwrap_err();

        assert!(matches!(err.into_inner(), E::EquipmentUnavailable(_)));
    }

    #[tokio::test]
    async fn validates_arguments() {
        let svc = fixture::service();
        let eq = fixture::equipment(&svc, "100", None, "0").await;
        let client = fixture::client(&svc).await;
        let employee = fixture::employee(&svc, "a@shop.ru").await;

        let err = svc
            .execute(cmd(&client, &eq, &employee, rental::Unit::Day, 0))
            .await
            .unwrap_err();
        assert!(matches!(err.into_inner(), E::InvalidPeriod));

        let err = svc
            .execute(OpenRental {
                planned_return_at: DateTime::now().coerce(),
                ..cmd(&client, &eq, &employee, rental::Unit::Day, 1)
            })
            .await
            .unwrap_err();
        assert!(matches!(err.into_inner(), E::InvalidPlannedReturn));

        let err = svc
            .execute(OpenRental {
                client_id: crate::domain::client::Id::new(),
                ..cmd(&client, &eq, &employee, rental::Unit::Day, 1)
            })
            .await
            .unwrap_err();
        assert!(matches!(err.into_inner(), E::ClientNotExists(_)));

        assert!(rentals(&svc).await.is_empty());
        assert_eq!(
            fixture::status_of(&svc, eq.id).await,
            equipment::Status::Available,
        );
    }
}
