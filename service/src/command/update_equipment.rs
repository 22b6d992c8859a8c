//! [`Command`] for updating an [`Equipment`].

use common::{
    operations::{By, Commit, Select, Transact, Transacted, Update},
    Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Rental;
use crate::{
    domain::{category, equipment, Category, Equipment},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating an [`Equipment`].
///
/// Never touches [`equipment::Status`] of the [`Equipment`]. Already opened
/// [`Rental`]s keep the prices they were opened with.
#[derive(Clone, Debug)]
pub struct UpdateEquipment {
    /// ID of the [`Equipment`] to update.
    pub equipment_id: equipment::Id,

    /// New [`equipment::Name`].
    pub name: equipment::Name,

    /// ID of the new [`Category`].
    pub category_id: category::Id,

    /// New [`equipment::SerialNumber`].
    pub serial_number: Option<equipment::SerialNumber>,

    /// New [`equipment::Description`].
    pub description: Option<equipment::Description>,

    /// New [`equipment::Notes`].
    pub notes: Option<equipment::Notes>,

    /// New price of a single rental day.
    pub daily_rate: Money,

    /// New price of a single rental hour.
    pub hourly_rate: Option<Money>,

    /// New deposit.
    pub deposit: Money,
}

impl<Db> Command<UpdateEquipment> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Equipment>, equipment::Id>>,
            Ok = Option<Equipment>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Category>, category::Id>>,
            Ok = Option<Category>,
            Err = Traced<database::Error>,
        > + Database<Update<Equipment>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Equipment;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateEquipment,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateEquipment {
            equipment_id,
            name,
            category_id,
            serial_number,
            description,
            notes,
            daily_rate,
            hourly_rate,
            deposit,
        } = cmd;

        let rates = equipment::Rates::new(daily_rate, hourly_rate, deposit)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut equipment = tx
            .execute(Select(By::<Option<Equipment>, _>::new(equipment_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::EquipmentNotExists(equipment_id))
            .map_err(tracerr::wrap!())?;
        if equipment.category_id != category_id {
            let category = tx
                .execute(Select(By::<Option<Category>, _>::new(category_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::CategoryNotExists(category_id))
                .map_err(tracerr::wrap!())?;
            equipment.category_id = category.id;
        }

        equipment.name = name;
        equipment.serial_number = serial_number;
        equipment.description = description;
        equipment.notes = notes;
        equipment.rates = rates;
        tx.execute(Update(equipment.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(equipment)
    }
}

/// Error of [`UpdateEquipment`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Equipment`] with the provided ID does not exist.
    #[display("`Equipment(id: {_0})` does not exist")]
    EquipmentNotExists(#[error(not(source))] equipment::Id),

    /// [`Category`] with the provided ID does not exist.
    #[display("`Category(id: {_0})` does not exist")]
    CategoryNotExists(#[error(not(source))] category::Id),

    /// Provided prices don't form valid [`equipment::Rates`].
    #[display("Invalid rates: {_0}")]
    #[from]
    InvalidRates(equipment::RatesError),
}

#[cfg(test)]
mod spec {
    use crate::{
        command::OpenRental,
        domain::{category, equipment, rental, Equipment},
        fixture,
        query::equipment::ById,
        Command as _, Query as _,
    };

    use super::{ExecutionError as E, UpdateEquipment};

    fn cmd(eq: &Equipment, daily: &str) -> UpdateEquipment {
        UpdateEquipment {
            equipment_id: eq.id,
            name: equipment::Name::new("Rotary hammer").unwrap(),
            category_id: eq.category_id,
            serial_number: None,
            description: equipment::Description::new("SDS-plus"),
            notes: None,
            daily_rate: fixture::rub(daily),
            hourly_rate: None,
            deposit: fixture::rub("500"),
        }
    }

    #[tokio::test]
    async fn keeps_status_and_rental_snapshot() {
        let svc = fixture::service();
        let eq = fixture::equipment(&svc, "100", None, "500").await;
        let client = fixture::client(&svc).await;
        let employee = fixture::employee(&svc, "a@shop.ru").await;
        let rental = svc
            .execute(OpenRental {
                client_id: client.id,
                equipment_id: eq.id,
                employee_id: employee.id,
                unit: rental::Unit::Day,
                period: 1,
                planned_return_at: fixture::tomorrow(),
                payment_status: rental::PaymentStatus::Paid,
                notes: None,
            })
            .await
            .unwrap();

        let updated = svc.execute(cmd(&eq, "300")).await.unwrap();

        assert_eq!(updated.name.to_string(), "Rotary hammer");
        assert_eq!(updated.rates.daily(), fixture::rub("300"));
        let stored = svc.execute(ById::by(eq.id)).await.unwrap().unwrap();
        assert_eq!(stored.status, equipment::Status::Rented);
        assert_eq!(stored.rates.daily(), fixture::rub("300"));
        assert_eq!(rental.total_cost, fixture::rub("600.00"));
    }

    #[tokio::test]
    async fn fails_on_missing_references() {
        let svc = fixture::service();
        let eq = fixture::equipment(&svc, "100", None, "500").await;

        let err = svc
            .execute(UpdateEquipment {
                category_id: category::Id::new(),
                ..cmd(&eq, "100")
            })
            .await
            .unwrap_err();
        assert!(matches!(err.into_inner(), E::CategoryNotExists(_)));

        let err = svc
            .execute(UpdateEquipment {
                equipment_id: equipment::Id::new(),
                ..cmd(&eq, "100")
            })
            .await
            .unwrap_err();
        assert!(matches!(err.into_inner(), E::EquipmentNotExists(_)));
    }
}
