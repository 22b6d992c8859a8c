//! [`Command`] for creating a new [`Equipment`].

use common::{
    operations::{By, Insert, Select},
    DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{category, equipment, Category, Equipment},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Equipment`].
///
/// A new [`Equipment`] is always [`equipment::Status::Available`].
#[derive(Clone, Debug)]
pub struct CreateEquipment {
    /// [`equipment::Name`] of a new [`Equipment`].
    pub name: equipment::Name,

    /// ID of the [`Category`] a new [`Equipment`] belongs to.
    pub category_id: category::Id,

    /// [`equipment::SerialNumber`] of a new [`Equipment`].
    pub serial_number: Option<equipment::SerialNumber>,

    /// [`equipment::Description`] of a new [`Equipment`].
    pub description: Option<equipment::Description>,

    /// [`equipment::Notes`] of a new [`Equipment`].
    pub notes: Option<equipment::Notes>,

    /// Price of a single rental day.
    pub daily_rate: Money,

    /// Price of a single rental hour.
    pub hourly_rate: Option<Money>,

    /// Deposit taken for a rental.
    pub deposit: Money,
}

impl<Db> Command<CreateEquipment> for Service<Db>
where
    Db: Database<
            Select<By<Option<Category>, category::Id>>,
            Ok = Option<Category>,
            Err = Traced<database::Error>,
        > + Database<Insert<Equipment>, Err = Traced<database::Error>>,
{
    type Ok = Equipment;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateEquipment,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateEquipment {
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

        let category = self
            .database()
            .execute(Select(By::<Option<Category>, _>::new(category_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::CategoryNotExists(category_id))
            .map_err(tracerr::wrap!())?;

        let equipment = Equipment {
            id: equipment::Id::new(),
            name,
            category_id: category.id,
            status: equipment::Status::Available,
            serial_number,
            description,
            notes,
            rates,
            created_at: DateTime::now().coerce(),
            deleted_at: None,
        };
        self.database()
            .execute(Insert(equipment.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tracing::debug!(equipment.id = %equipment.id, "equipment created");

        Ok(equipment)
    }
}

/// Error of [`CreateEquipment`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

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
    use common::{Currency, Money};

    use crate::{
        domain::{category, equipment},
        fixture, Command as _,
    };

    use super::{CreateEquipment, ExecutionError as E};

    fn cmd(category_id: category::Id) -> CreateEquipment {
        CreateEquipment {
            name: equipment::Name::new("Ladder").unwrap(),
            category_id,
            serial_number: equipment::SerialNumber::new("LD-001"),
            description: None,
            notes: None,
            daily_rate: fixture::rub("150"),
            hourly_rate: Some(fixture::rub("20")),
            deposit: fixture::rub("1000"),
        }
    }

    #[tokio::test]
    async fn creates_available_equipment() {
        let svc = fixture::service();
        let category = fixture::category(&svc).await;

        let eq = svc.execute(cmd(category.id)).await.unwrap();

        assert_eq!(eq.status, equipment::Status::Available);
        assert_eq!(eq.rates.deposit(), fixture::rub("1000"));
        assert_eq!(
            fixture::status_of(&svc, eq.id).await,
            equipment::Status::Available,
        );
    }

    #[tokio::test]
    async fn requires_existing_category() {
        let svc = fixture::service();

        let err = svc.execute(cmd(category::Id::new())).await.unwrap_err();

        assert!(matches!(err.into_inner(), E::CategoryNotExists(_)));
    }

    #[tokio::test]
    async fn validates_rates() {
        let svc = fixture::service();
        let category = fixture::category(&svc).await;

        let err = svc
            .execute(CreateEquipment {
                hourly_rate: Some(Money::new(20.into(), Currency::Usd)),
                ..cmd(category.id)
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.into_inner(),
            E::InvalidRates(equipment::RatesError::CurrencyMismatch),
        ));

        let err = svc
            .execute(CreateEquipment {
                deposit: fixture::rub("-1"),
                ..cmd(category.id)
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.into_inner(),
            E::InvalidRates(equipment::RatesError::Negative),
        ));
    }
}
